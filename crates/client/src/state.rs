//! Application state shared across surfaces.

use std::sync::Arc;

use thiserror::Error;

use crate::account::AccountService;
use crate::api::ApiClient;
use crate::auth::{AuthError, AuthState};
use crate::cart::CartStore;
use crate::config::{ClientConfig, ConfigError};
use crate::error::ApiError;
use crate::storage::{FileStore, KeyValueStore};

/// Error building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not build the API client: {0}")]
    Api(#[from] ApiError),
}

/// Application state bundling the stores and the API client.
///
/// Cheaply cloneable via `Arc`; every clone shares the same storage, caches
/// and listener registries.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    storage: Arc<dyn KeyValueStore>,
    api: ApiClient,
    auth: AuthState,
    cart: CartStore,
    account: AccountService,
}

impl AppState {
    /// Create the application state over an explicit store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self, StateError> {
        let api = ApiClient::new(&config, Arc::clone(&storage))?;
        let auth = AuthState::new(Arc::clone(&storage));
        let cart = CartStore::new(Arc::clone(&storage));
        let account = AccountService::new();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                api,
                auth,
                cart,
                account,
            }),
        })
    }

    /// Create the application state from environment configuration, with the
    /// file-backed store at the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the HTTP client
    /// cannot be constructed.
    pub fn from_env() -> Result<Self, StateError> {
        let config = ClientConfig::from_env()?;
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_path));
        Self::new(config, storage)
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the persistent key-value store.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.storage
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the auth state.
    #[must_use]
    pub fn auth(&self) -> &AuthState {
        &self.inner.auth
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn account(&self) -> &AccountService {
        &self.inner.account
    }

    /// Log out: clear the persisted auth state and the session's resolved
    /// Cliente.
    ///
    /// # Errors
    ///
    /// Propagates storage failures from clearing the token.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.inner.account.reset();
        self.inner.auth.logout()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::path::PathBuf;
    use std::time::Duration;

    fn test_config() -> ClientConfig {
        ClientConfig {
            api_url: "http://127.0.0.1:8000".to_owned(),
            storage_path: PathBuf::from("unused.json"),
            http_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_state_shares_storage_between_stores() {
        let state = AppState::new(test_config(), Arc::new(MemoryStore::new())).unwrap();

        // A token written through storage is visible to auth.
        state
            .storage()
            .set(crate::storage::keys::AUTH_TOKEN, "tok")
            .unwrap();
        assert!(state.auth().is_authenticated());

        // Clones share everything.
        let clone = state.clone();
        assert!(clone.auth().is_authenticated());
    }

    #[test]
    fn test_logout_clears_auth() {
        let state = AppState::new(test_config(), Arc::new(MemoryStore::new())).unwrap();
        state
            .storage()
            .set(crate::storage::keys::AUTH_TOKEN, "tok")
            .unwrap();

        state.logout().unwrap();
        assert!(!state.auth().is_authenticated());
        assert!(state.account().current_cliente().is_none());
    }
}
