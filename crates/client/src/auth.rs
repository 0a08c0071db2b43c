//! Login state backed by a persisted bearer token.
//!
//! [`AuthState`] is the single source of truth for "is a user logged in and
//! who are they". The token lives in the persistent store under a fixed key;
//! the in-memory copy is a convenience that is re-validated against the store
//! before anything authenticated happens, so a token written or cleared by
//! another process is picked up on the next call.

use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doceria_core::UserId;

use crate::api::ApiClient;
use crate::api::types::{AuthMessage, TokenClaims};
use crate::error::ApiError;
use crate::listeners::{Listeners, Subscription};
use crate::storage::{KeyValueStore, StorageError, keys};

/// The identity derived from a bearer token.
///
/// Persisted as JSON under the user storage key, in the same shape the wire
/// uses (`nome`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Option<UserId>,
    pub email: String,
    #[serde(rename = "nome")]
    pub name: String,
}

/// Event broadcast after every auth mutation.
#[derive(Debug, Clone)]
pub struct AuthChange {
    pub is_authenticated: bool,
    pub user: Option<AuthUser>,
}

/// Authentication failures that are not plain API errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login response carried no access token.
    #[error("no access token returned by the server")]
    MissingToken,

    /// The store rejected the write.
    #[error("could not persist auth state: {0}")]
    Storage(#[from] StorageError),

    /// The store accepted the write but read back a different value
    /// (quota exhaustion, privacy mode, a racing writer).
    #[error("persisted token did not read back from the store")]
    WriteVerification,

    /// The backend call itself failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Single source of truth for the login state.
#[derive(Clone)]
pub struct AuthState {
    inner: Arc<AuthStateInner>,
}

struct AuthStateInner {
    storage: Arc<dyn KeyValueStore>,
    token: Mutex<Option<SecretString>>,
    user: Mutex<Option<AuthUser>>,
    listeners: Listeners<AuthChange>,
}

impl AuthState {
    /// Create an auth state, restoring any persisted token and user.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let token = storage
            .get(keys::AUTH_TOKEN)
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        if token.is_some() {
            tracing::debug!("restored bearer token from the store");
        }

        let user = storage.get(keys::AUTH_USER).and_then(|raw| {
            serde_json::from_str(&raw)
                .inspect_err(|err| tracing::warn!(%err, "stored user is unreadable; ignoring"))
                .ok()
        });

        Self {
            inner: Arc::new(AuthStateInner {
                storage,
                token: Mutex::new(token),
                user: Mutex::new(user),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Register a listener for [`AuthChange`] events.
    pub fn on_change(
        &self,
        listener: impl Fn(&AuthChange) + Send + Sync + 'static,
    ) -> Subscription<AuthChange> {
        self.inner.listeners.subscribe(listener)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// True iff a non-empty token exists in the persistent store.
    ///
    /// The store is re-read on every call (not just the cached copy) to
    /// tolerate external mutation; the cache is refreshed as a side effect.
    pub fn is_authenticated(&self) -> bool {
        let token = self
            .inner
            .storage
            .get(keys::AUTH_TOKEN)
            .filter(|t| !t.is_empty());
        let authenticated = token.is_some();

        *self.inner.token.lock().unwrap_or_else(PoisonError::into_inner) =
            token.map(SecretString::from);

        authenticated
    }

    /// The cached derived user, if any.
    #[must_use]
    pub fn user(&self) -> Option<AuthUser> {
        self.inner
            .user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The freshest token, straight from the store.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner
            .storage
            .get(keys::AUTH_TOKEN)
            .filter(|t| !t.is_empty())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Authenticate against the backend and persist the resulting state.
    ///
    /// Returns the derived user - `None` only when the token payload carried
    /// no usable identity and no fallback email was available.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingToken`] when the backend answered 2xx without an
    /// access token; [`AuthError::Api`] for login failures (wrong password is
    /// an `ApiError::Http` with the backend's detail message, for display
    /// as-is).
    pub async fn login(
        &self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthUser>, AuthError> {
        tracing::debug!(email, "logging in");
        let response = api.login(email, password).await?;

        if response.access_token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let user = self.persist_auth(&response.access_token, Some(email))?;
        tracing::info!(email, "login succeeded");
        Ok(user)
    }

    /// `POST /auth/register` passthrough; does not log the new user in.
    ///
    /// # Errors
    ///
    /// Propagates backend failures (a taken email is `ApiError::Duplicate`).
    pub async fn register(
        &self,
        api: &ApiClient,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthMessage, AuthError> {
        Ok(api.register(name, email, password).await?)
    }

    /// `POST /auth/change-password` passthrough (requires a stored token).
    ///
    /// # Errors
    ///
    /// Propagates backend failures; a wrong current password surfaces as the
    /// backend's detail message.
    pub async fn change_password(
        &self,
        api: &ApiClient,
        current_password: &str,
        new_password: &str,
    ) -> Result<AuthMessage, AuthError> {
        Ok(api.change_password(current_password, new_password).await?)
    }

    /// Clear token and user from the store and notify listeners.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the removals fail; in-memory state is
    /// cleared regardless.
    pub fn logout(&self) -> Result<(), AuthError> {
        *self.inner.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        *self.inner.user.lock().unwrap_or_else(PoisonError::into_inner) = None;

        let token_result = self.inner.storage.remove(keys::AUTH_TOKEN);
        let user_result = self.inner.storage.remove(keys::AUTH_USER);

        self.notify();
        tracing::info!("logged out");

        token_result?;
        user_result?;
        Ok(())
    }

    /// Persist a freshly issued token and the user derived from it.
    ///
    /// Write-then-verify: after writing, the store is re-read and compared,
    /// failing loudly instead of leaving a half-persisted session behind.
    fn persist_auth(
        &self,
        token: &str,
        fallback_email: Option<&str>,
    ) -> Result<Option<AuthUser>, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        self.inner.storage.set(keys::AUTH_TOKEN, token)?;
        let stored = self.inner.storage.get(keys::AUTH_TOKEN);
        if stored.as_deref() != Some(token) {
            tracing::error!("token write verification failed");
            return Err(AuthError::WriteVerification);
        }

        *self.inner.token.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(SecretString::from(token.to_owned()));

        let claims = decode_token_payload(token);
        let user = build_user(claims.as_ref(), fallback_email);

        match &user {
            Some(user) => {
                let raw = serde_json::to_string(user).map_err(StorageError::from)?;
                self.inner.storage.set(keys::AUTH_USER, &raw)?;
            }
            None => {
                tracing::warn!("token payload yielded no user");
                self.inner.storage.remove(keys::AUTH_USER)?;
            }
        }

        *self.inner.user.lock().unwrap_or_else(PoisonError::into_inner) = user.clone();
        self.notify();
        Ok(user)
    }

    fn notify(&self) {
        let event = AuthChange {
            is_authenticated: self
                .inner
                .token
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some(),
            user: self.user(),
        };
        self.inner.listeners.emit(&event);
    }
}

// =============================================================================
// Token decoding
// =============================================================================

/// Decode the payload segment of a bearer token.
///
/// A token is three dot-separated base64url segments. Issuers differ on
/// padding, so trailing `=` is stripped before decoding. Any failure -
/// missing segments, bad base64, bad JSON - yields `None` rather than an
/// error: an undecodable token still authenticates requests, it just carries
/// no identity.
pub(crate) fn decode_token_payload(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    segments.next()?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .inspect_err(|err| tracing::warn!(%err, "bearer token payload is not base64url"))
        .ok()?;

    serde_json::from_slice(&bytes)
        .inspect_err(|err| tracing::warn!(%err, "bearer token payload is not valid JSON"))
        .ok()
}

/// Derive a user from token claims, falling back to the login email.
///
/// The display name prefers the `nome` claim, then the local part of the
/// email, then a generic placeholder.
fn build_user(claims: Option<&TokenClaims>, fallback_email: Option<&str>) -> Option<AuthUser> {
    let email = claims
        .and_then(|c| c.email.clone())
        .or_else(|| fallback_email.map(str::to_owned))?;

    let name = claims
        .and_then(|c| c.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| {
            let local = email.split('@').next().unwrap_or("");
            if local.is_empty() {
                "Cliente".to_owned()
            } else {
                local.to_owned()
            }
        });

    Some(AuthUser {
        id: claims.and_then(|c| c.id).map(UserId::new),
        email,
        name,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Unsigned test token with the given JSON payload.
    fn fake_token(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.signature")
    }

    fn state_with_store() -> (AuthState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = AuthState::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        (state, store)
    }

    #[test]
    fn test_decode_valid_token() {
        let token = fake_token(r#"{"id":9,"email":"ana@example.com","exp":1999999999}"#);
        let claims = decode_token_payload(&token).unwrap();
        assert_eq!(claims.id, Some(9));
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_decode_token_with_padding() {
        // A payload whose base64 ends in padding when encoded the strict way.
        let payload = r#"{"email":"a@b.c"}"#;
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let mut body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        while body.len() % 4 != 0 {
            body.push('=');
        }
        let token = format!("{header}.{body}.sig");
        let claims = decode_token_payload(&token).unwrap();
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_decode_malformed_token_yields_none() {
        assert!(decode_token_payload("").is_none());
        assert!(decode_token_payload("one-segment").is_none());
        assert!(decode_token_payload("a.b").is_none());
        assert!(decode_token_payload("a.!!!not-base64!!!.c").is_none());

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"plain text"));
        assert!(decode_token_payload(&not_json).is_none());
    }

    #[test]
    fn test_build_user_prefers_claims() {
        let claims = TokenClaims {
            id: Some(4),
            email: Some("ana@example.com".to_owned()),
            name: Some("Ana".to_owned()),
            exp: None,
        };
        let user = build_user(Some(&claims), Some("other@example.com")).unwrap();
        assert_eq!(user.id, Some(UserId::new(4)));
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.name, "Ana");
    }

    #[test]
    fn test_build_user_falls_back_to_email_local_part() {
        let claims = TokenClaims::default();
        let user = build_user(Some(&claims), Some("joao.silva@example.com")).unwrap();
        assert_eq!(user.name, "joao.silva");
        assert_eq!(user.id, None);
    }

    #[test]
    fn test_build_user_without_any_email() {
        assert!(build_user(None, None).is_none());
        assert!(build_user(Some(&TokenClaims::default()), None).is_none());
    }

    #[test]
    fn test_persist_then_restore() {
        let (state, store) = state_with_store();
        let token = fake_token(r#"{"id":1,"email":"ana@example.com"}"#);
        let user = state.persist_auth(&token, None).unwrap().unwrap();
        assert_eq!(user.name, "ana");

        // A fresh state over the same store restores everything.
        let restored = AuthState::new(store as Arc<dyn KeyValueStore>);
        assert!(restored.is_authenticated());
        assert_eq!(restored.user().unwrap().email, "ana@example.com");
    }

    #[test]
    fn test_is_authenticated_tracks_external_store_changes() {
        let (state, store) = state_with_store();
        assert!(!state.is_authenticated());

        // Someone else writes a token directly to the store.
        store.set(keys::AUTH_TOKEN, "external-token").unwrap();
        assert!(state.is_authenticated());
        assert_eq!(state.token().as_deref(), Some("external-token"));

        // ...and removes it again.
        store.remove(keys::AUTH_TOKEN).unwrap();
        assert!(!state.is_authenticated());
        assert_eq!(state.token(), None);
    }

    #[test]
    fn test_empty_stored_token_is_not_authenticated() {
        let (state, store) = state_with_store();
        store.set(keys::AUTH_TOKEN, "").unwrap();
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_logout_clears_store_and_notifies() {
        let (state, store) = state_with_store();
        let token = fake_token(r#"{"email":"ana@example.com"}"#);
        state.persist_auth(&token, None).unwrap();

        let events = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&events);
        let _sub = state.on_change(move |change| {
            assert!(!change.is_authenticated);
            assert!(change.user.is_none());
            seen.fetch_add(1, Ordering::SeqCst);
        });

        state.logout().unwrap();
        assert_eq!(events.load(Ordering::SeqCst), 1);
        assert_eq!(store.get(keys::AUTH_TOKEN), None);
        assert_eq!(store.get(keys::AUTH_USER), None);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_persist_notifies_with_user() {
        let (state, _store) = state_with_store();
        let events = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&events);
        let _sub = state.on_change(move |change| {
            assert!(change.is_authenticated);
            assert_eq!(change.user.as_ref().unwrap().email, "ana@example.com");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let token = fake_token(r#"{"email":"ana@example.com"}"#);
        state.persist_auth(&token, None).unwrap();
        assert_eq!(events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_undecodable_token_still_authenticates() {
        let (state, store) = state_with_store();
        // No usable payload and no fallback email: token persists, user is None.
        let user = state.persist_auth("a.b.c", None).unwrap();
        assert!(user.is_none());
        assert!(state.is_authenticated());
        assert_eq!(store.get(keys::AUTH_USER), None);
    }

    #[test]
    fn test_empty_token_rejected() {
        let (state, _store) = state_with_store();
        assert!(matches!(
            state.persist_auth("", None),
            Err(AuthError::MissingToken)
        ));
    }
}
