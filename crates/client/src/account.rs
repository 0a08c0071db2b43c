//! Account bootstrap: mapping the logged-in user to a backend Cliente.
//!
//! A Cliente record may or may not exist for a freshly logged-in user - the
//! register endpoint creates one, but older accounts and partially-completed
//! registrations left gaps, and the backend has no upsert. [`AccountService`]
//! resolves the user to exactly one Cliente with a fixed ladder of
//! strategies, memoizing the result for the session.
//!
//! The directory operations are a trait so the ladder can be exercised
//! against a scripted fake; [`crate::api::ApiClient`] is the production
//! implementation.

use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;

use doceria_core::{ClienteId, PedidoStatus};

use crate::api::ApiClient;
use crate::api::types::{Cliente, ClienteCreate, ClienteResumo, ClienteUpdate, PedidoResumo};
use crate::auth::{AuthState, AuthUser};
use crate::error::ApiError;

/// How many orders the dashboard shows as "recent".
const RECENT_ORDERS: usize = 5;

const SESSION_EXPIRED: &str = "sessão expirada, faça login novamente";
const NOT_LOGGED_IN: &str = "faça login para acessar sua conta";

/// The Cliente lookup/creation operations the resolution ladder needs.
#[allow(async_fn_in_trait)]
pub trait ClienteDirectory {
    /// Exact-email lookup; 404 when no record exists.
    async fn find_by_email(&self, email: &str) -> Result<Cliente, ApiError>;
    /// Fuzzy search over name/email/phone/CPF.
    async fn search(&self, term: &str) -> Result<Vec<ClienteResumo>, ApiError>;
    /// Fetch a full record by id.
    async fn fetch(&self, id: ClienteId) -> Result<Cliente, ApiError>;
    /// Create a new record.
    async fn create(&self, input: &ClienteCreate) -> Result<Cliente, ApiError>;
}

impl ClienteDirectory for ApiClient {
    async fn find_by_email(&self, email: &str) -> Result<Cliente, ApiError> {
        self.find_cliente_by_email(email).await
    }

    async fn search(&self, term: &str) -> Result<Vec<ClienteResumo>, ApiError> {
        self.search_clientes(term).await
    }

    async fn fetch(&self, id: ClienteId) -> Result<Cliente, ApiError> {
        self.get_cliente(id).await
    }

    async fn create(&self, input: &ClienteCreate) -> Result<Cliente, ApiError> {
        self.create_cliente(input).await
    }
}

/// Per-session Cliente resolution and account dashboard data.
#[derive(Clone, Default)]
pub struct AccountService {
    inner: Arc<AccountServiceInner>,
}

#[derive(Default)]
struct AccountServiceInner {
    cliente: Mutex<Option<Cliente>>,
}

impl AccountService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The memoized Cliente, if this session already resolved one.
    #[must_use]
    pub fn current_cliente(&self) -> Option<Cliente> {
        self.inner
            .cliente
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop the memoized Cliente (call on logout).
    pub fn reset(&self) {
        *self
            .inner
            .cliente
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Resolve the logged-in user to exactly one Cliente.
    ///
    /// Strategy ladder, in order: memoized record; exact-email lookup; fuzzy
    /// search filtered to a case-insensitive email match; create from the
    /// user's profile, with a duplicate-email conflict recovered by retrying
    /// the lookups once. Two concurrent calls may both run the ladder; every
    /// strategy is idempotent, so they converge on the same record.
    ///
    /// # Errors
    ///
    /// `ApiError::Session` when not logged in or the token has expired,
    /// `ApiError::Recovery` when a duplicate exists but cannot be retrieved,
    /// and any unexpected error unchanged.
    pub async fn resolve<D: ClienteDirectory>(
        &self,
        directory: &D,
        auth: &AuthState,
    ) -> Result<Cliente, ApiError> {
        if let Some(cliente) = self.current_cliente() {
            return Ok(cliente);
        }

        if !auth.is_authenticated() {
            return Err(ApiError::Session(NOT_LOGGED_IN.to_owned()));
        }
        let user = auth
            .user()
            .ok_or_else(|| ApiError::Session(NOT_LOGGED_IN.to_owned()))?;

        let cliente = resolve_uncached(directory, &user).await?;
        tracing::info!(cliente_id = %cliente.id, "cliente resolved");

        *self
            .inner
            .cliente
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(cliente.clone());
        Ok(cliente)
    }

    /// Load everything the account dashboard shows: the Cliente, order
    /// statistics, and the most recent orders.
    ///
    /// # Errors
    ///
    /// Propagates resolution and listing failures.
    pub async fn dashboard(
        &self,
        api: &ApiClient,
        auth: &AuthState,
    ) -> Result<Dashboard, ApiError> {
        let cliente = self.resolve(api, auth).await?;
        let pedidos = api.list_pedidos_by_cliente(cliente.id).await?;
        let stats = OrderStats::from_pedidos(&pedidos);
        let recent = recent_pedidos(pedidos, RECENT_ORDERS);

        Ok(Dashboard {
            cliente,
            stats,
            recent,
        })
    }

    /// Update the resolved Cliente's profile and refresh the memoized copy.
    ///
    /// # Errors
    ///
    /// Propagates resolution and update failures (changing the email to one
    /// in use is `ApiError::Duplicate`).
    pub async fn update_profile(
        &self,
        api: &ApiClient,
        auth: &AuthState,
        changes: &ClienteUpdate,
    ) -> Result<Cliente, ApiError> {
        let cliente = self.resolve(api, auth).await?;
        let updated = api.update_cliente(cliente.id, changes).await?;

        *self
            .inner
            .cliente
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(updated.clone());
        Ok(updated)
    }
}

// =============================================================================
// Resolution ladder
// =============================================================================

async fn resolve_uncached<D: ClienteDirectory>(
    directory: &D,
    user: &AuthUser,
) -> Result<Cliente, ApiError> {
    // Exact-email lookup first; 404 means "not yet registered" and anything
    // else non-fatal degrades to the search strategies.
    match directory.find_by_email(&user.email).await {
        Ok(cliente) => return Ok(cliente),
        Err(err) if err.is_not_found() => {
            tracing::debug!(email = %user.email, "no exact-email match");
        }
        Err(ApiError::Session(_)) => {
            return Err(ApiError::Session(SESSION_EXPIRED.to_owned()));
        }
        Err(err) => {
            tracing::warn!(%err, "exact-email lookup failed; falling back to search");
        }
    }

    if let Some(cliente) = search_by_email(directory, &user.email).await {
        return Ok(cliente);
    }

    // Nothing found: create from the user's profile.
    let input = cliente_profile(user);
    match directory.create(&input).await {
        Ok(cliente) => Ok(cliente),
        Err(ApiError::Session(_)) => Err(ApiError::Session(SESSION_EXPIRED.to_owned())),
        Err(ApiError::Duplicate(detail)) => {
            // A record exists after all (raced registration, partial prior
            // flow). Retry the lookups once before giving up.
            tracing::info!(%detail, "cliente already exists; recovering");
            match directory.find_by_email(&user.email).await {
                Ok(cliente) => Ok(cliente),
                Err(err) => {
                    tracing::warn!(%err, "exact-email recovery failed; retrying search");
                    match search_by_email(directory, &user.email).await {
                        Some(cliente) => Ok(cliente),
                        None => Err(ApiError::Recovery(
                            "cliente já existe mas não pôde ser recuperado; tente fazer login novamente"
                                .to_owned(),
                        )),
                    }
                }
            }
        }
        Err(err) => Err(err),
    }
}

/// Best-effort fuzzy-search strategy: failures are logged and swallowed.
async fn search_by_email<D: ClienteDirectory>(directory: &D, email: &str) -> Option<Cliente> {
    let results = match directory.search(email).await {
        Ok(results) => results,
        Err(err) => {
            tracing::warn!(%err, "cliente search failed");
            return None;
        }
    };

    let hit = results
        .iter()
        .find(|cliente| cliente.email.eq_ignore_ascii_case(email))?;

    match directory.fetch(hit.id).await {
        Ok(cliente) => Some(cliente),
        Err(err) => {
            tracing::warn!(%err, cliente_id = %hit.id, "cliente fetch failed");
            None
        }
    }
}

/// The creation payload for a user with no Cliente yet: name (falling back
/// to the email's local part), email, nothing else. Blank optionals are
/// omitted, not sent empty.
fn cliente_profile(user: &AuthUser) -> ClienteCreate {
    let name = if user.name.is_empty() {
        user.email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or("Cliente")
            .to_owned()
    } else {
        user.name.clone()
    };

    ClienteCreate {
        name,
        email: user.email.clone(),
        ..ClienteCreate::default()
    }
}

// =============================================================================
// Dashboard data
// =============================================================================

/// Order statistics shown on the account dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderStats {
    /// All orders ever placed.
    pub total: usize,
    /// Orders delivered.
    pub delivered: usize,
    /// Orders still in flight.
    pub open: usize,
    /// Total spent across delivered orders.
    pub total_spent: Decimal,
}

impl OrderStats {
    #[must_use]
    pub fn from_pedidos(pedidos: &[PedidoResumo]) -> Self {
        let delivered = pedidos
            .iter()
            .filter(|p| p.status == PedidoStatus::Entregue)
            .count();
        let open = pedidos.iter().filter(|p| p.status.is_open()).count();
        let total_spent = pedidos
            .iter()
            .filter(|p| p.status == PedidoStatus::Entregue)
            .map(|p| p.total)
            .sum();

        Self {
            total: pedidos.len(),
            delivered,
            open,
            total_spent,
        }
    }
}

/// Everything the account dashboard renders.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub cliente: Cliente,
    pub stats: OrderStats,
    pub recent: Vec<PedidoResumo>,
}

/// Most recent `n` orders, newest first.
fn recent_pedidos(mut pedidos: Vec<PedidoResumo>, n: usize) -> Vec<PedidoResumo> {
    pedidos.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
    pedidos.truncate(n);
    pedidos
}
