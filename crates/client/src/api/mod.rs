//! REST client for the Doceria backend.
//!
//! # Architecture
//!
//! - Plain JSON-over-HTTP via `reqwest`; the backend is the source of truth
//! - Stateless: the bearer token is re-read from the persistent store before
//!   every authenticated request, never from an in-memory copy
//! - In-memory caching via `moka` for read-only catalog responses
//!   (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use doceria_client::api::ApiClient;
//!
//! let api = ApiClient::new(&config, storage)?;
//!
//! let produtos = api.list_produtos().await?;
//! let pedido = api.find_pedido_by_numero("PED-0012").await?;
//! ```

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;

use doceria_core::{ClienteId, KitId, PagamentoId, PedidoId, ProdutoId};

use crate::config::ClientConfig;
use crate::error::{ApiError, classify_response};
use crate::storage::{KeyValueStore, keys};
use types::{
    AuthMessage, Categoria, ChangePasswordRequest, Cliente, ClienteCreate, ClienteResumo,
    ClienteUpdate, Contato, ContatoCreate, HistoricoPagamento, Kit, LoginRequest, Pagamento,
    PagamentoResumo, Pedido, PedidoCreate, PedidoFilter, PedidoResumo, Produto, ProdutoCreate,
    RegisterRequest, TokenResponse,
};

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Whether a call carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Public,
    Required,
}

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Categorias,
    Produtos,
    Produto(ProdutoId),
    Kits,
    Kit(KitId),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Categorias(Arc<Vec<Categoria>>),
    Produtos(Arc<Vec<Produto>>),
    Produto(Arc<Produto>),
    Kits(Arc<Vec<Kit>>),
    Kit(Arc<Kit>),
}

/// Error body shape the backend uses for non-2xx responses.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Client for the Doceria REST API.
///
/// Cheap to clone; all clones share the HTTP connection pool and the catalog
/// cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn KeyValueStore>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                storage,
                cache,
            }),
        })
    }

    /// The freshest bearer token, straight from the persistent store.
    fn bearer_token(&self) -> Option<String> {
        self.inner
            .storage
            .get(keys::AUTH_TOKEN)
            .filter(|token| !token.is_empty())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request plumbing
    // ─────────────────────────────────────────────────────────────────────────

    async fn execute<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&impl Serialize>,
        auth: AuthMode,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);
        let mut request = self.inner.http.request(method, &url);

        if auth == AuthMode::Required {
            if let Some(token) = self.bearer_token() {
                request = request.bearer_auth(token);
            } else {
                // The request still goes out and the backend answers 401,
                // which classifies as a Session error for the caller.
                tracing::error!(path, "authenticated request without a stored token");
            }
        }

        if let Some(pairs) = query {
            request = request.query(pairs);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%url, "sending request");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .map(|body| body.detail);
            return Err(classify_response(status.as_u16(), detail));
        }

        serde_json::from_str(&text).map_err(|err| {
            tracing::error!(
                %url,
                %err,
                body = %text.chars().take(200).collect::<String>(),
                "unexpected response shape"
            );
            ApiError::Parse(err)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, auth: AuthMode) -> Result<T, ApiError> {
        self.execute(reqwest::Method::GET, path, None, None::<&()>, auth)
            .await
    }

    async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: AuthMode,
    ) -> Result<T, ApiError> {
        self.execute(reqwest::Method::GET, path, Some(query), None::<&()>, auth)
            .await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        auth: AuthMode,
    ) -> Result<T, ApiError> {
        self.execute(reqwest::Method::POST, path, None, Some(body), auth)
            .await
    }

    async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        auth: AuthMode,
    ) -> Result<T, ApiError> {
        self.execute(reqwest::Method::PUT, path, None, Some(body), auth)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth
    // ─────────────────────────────────────────────────────────────────────────

    /// `POST /auth/login` - returns the raw token response; persisting it is
    /// [`crate::auth::AuthState`]'s job.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        self.post_json(
            "/auth/login",
            &LoginRequest { email, password },
            AuthMode::Public,
        )
        .await
    }

    /// `POST /auth/register`.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthMessage, ApiError> {
        self.post_json(
            "/auth/register",
            &RegisterRequest {
                name,
                email,
                password,
            },
            AuthMode::Public,
        )
        .await
    }

    /// `POST /auth/change-password` (authenticated).
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<AuthMessage, ApiError> {
        self.post_json(
            "/auth/change-password",
            &ChangePasswordRequest {
                current_password,
                new_password,
            },
            AuthMode::Required,
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Categorias
    // ─────────────────────────────────────────────────────────────────────────

    /// `GET /categorias/` (cached).
    pub async fn list_categorias(&self) -> Result<Vec<Categoria>, ApiError> {
        if let Some(CacheValue::Categorias(cached)) =
            self.inner.cache.get(&CacheKey::Categorias).await
        {
            return Ok(cached.as_ref().clone());
        }

        let categorias: Vec<Categoria> = self.get_json("/categorias/", AuthMode::Public).await?;
        self.inner
            .cache
            .insert(
                CacheKey::Categorias,
                CacheValue::Categorias(Arc::new(categorias.clone())),
            )
            .await;
        Ok(categorias)
    }

    /// `POST /categorias/` (authenticated).
    pub async fn create_categoria(&self, name: &str) -> Result<Categoria, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            nome: &'a str,
        }

        self.post_json("/categorias/", &Body { nome: name }, AuthMode::Required)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Produtos
    // ─────────────────────────────────────────────────────────────────────────

    /// `GET /produtos/` (cached).
    pub async fn list_produtos(&self) -> Result<Vec<Produto>, ApiError> {
        if let Some(CacheValue::Produtos(cached)) = self.inner.cache.get(&CacheKey::Produtos).await
        {
            return Ok(cached.as_ref().clone());
        }

        let produtos: Vec<Produto> = self.get_json("/produtos/", AuthMode::Public).await?;
        self.inner
            .cache
            .insert(
                CacheKey::Produtos,
                CacheValue::Produtos(Arc::new(produtos.clone())),
            )
            .await;
        Ok(produtos)
    }

    /// `GET /produtos/{id}` (cached).
    pub async fn get_produto(&self, id: ProdutoId) -> Result<Produto, ApiError> {
        if let Some(CacheValue::Produto(cached)) =
            self.inner.cache.get(&CacheKey::Produto(id)).await
        {
            return Ok(cached.as_ref().clone());
        }

        let produto: Produto = self
            .get_json(&format!("/produtos/{id}"), AuthMode::Public)
            .await?;
        self.inner
            .cache
            .insert(
                CacheKey::Produto(id),
                CacheValue::Produto(Arc::new(produto.clone())),
            )
            .await;
        Ok(produto)
    }

    /// `POST /produtos/` (authenticated).
    pub async fn create_produto(&self, produto: &ProdutoCreate) -> Result<Produto, ApiError> {
        self.post_json("/produtos/", produto, AuthMode::Required)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Kits
    // ─────────────────────────────────────────────────────────────────────────

    /// `GET /kits/` (cached).
    pub async fn list_kits(&self) -> Result<Vec<Kit>, ApiError> {
        if let Some(CacheValue::Kits(cached)) = self.inner.cache.get(&CacheKey::Kits).await {
            return Ok(cached.as_ref().clone());
        }

        let kits: Vec<Kit> = self.get_json("/kits/", AuthMode::Public).await?;
        self.inner
            .cache
            .insert(CacheKey::Kits, CacheValue::Kits(Arc::new(kits.clone())))
            .await;
        Ok(kits)
    }

    /// `GET /kits/{id}` (cached).
    pub async fn get_kit(&self, id: KitId) -> Result<Kit, ApiError> {
        if let Some(CacheValue::Kit(cached)) = self.inner.cache.get(&CacheKey::Kit(id)).await {
            return Ok(cached.as_ref().clone());
        }

        let kit: Kit = self
            .get_json(&format!("/kits/{id}"), AuthMode::Public)
            .await?;
        self.inner
            .cache
            .insert(CacheKey::Kit(id), CacheValue::Kit(Arc::new(kit.clone())))
            .await;
        Ok(kit)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clientes
    // ─────────────────────────────────────────────────────────────────────────

    /// `POST /clientes/` (authenticated).
    pub async fn create_cliente(&self, cliente: &ClienteCreate) -> Result<Cliente, ApiError> {
        self.post_json("/clientes/", cliente, AuthMode::Required)
            .await
    }

    /// `GET /clientes/{id}` (authenticated).
    pub async fn get_cliente(&self, id: ClienteId) -> Result<Cliente, ApiError> {
        self.get_json(&format!("/clientes/{id}"), AuthMode::Required)
            .await
    }

    /// `GET /clientes/buscar?q=` (authenticated) - fuzzy search over name,
    /// email, phone and CPF.
    pub async fn search_clientes(&self, term: &str) -> Result<Vec<ClienteResumo>, ApiError> {
        self.get_json_with_query(
            "/clientes/buscar",
            &[("q", term.to_owned())],
            AuthMode::Required,
        )
        .await
    }

    /// `GET /clientes/por-email?email=` (authenticated) - exact-email lookup,
    /// 404 when absent.
    pub async fn find_cliente_by_email(&self, email: &str) -> Result<Cliente, ApiError> {
        self.get_json_with_query(
            "/clientes/por-email",
            &[("email", email.to_owned())],
            AuthMode::Required,
        )
        .await
    }

    /// `PUT /clientes/{id}` (authenticated).
    pub async fn update_cliente(
        &self,
        id: ClienteId,
        changes: &ClienteUpdate,
    ) -> Result<Cliente, ApiError> {
        self.put_json(&format!("/clientes/{id}"), changes, AuthMode::Required)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pedidos
    // ─────────────────────────────────────────────────────────────────────────

    /// `POST /pedidos/` (authenticated).
    pub async fn create_pedido(&self, pedido: &PedidoCreate) -> Result<Pedido, ApiError> {
        self.post_json("/pedidos/", pedido, AuthMode::Required)
            .await
    }

    /// `GET /pedidos/` with paging and optional filters (authenticated).
    pub async fn list_pedidos(&self, filter: &PedidoFilter) -> Result<Vec<PedidoResumo>, ApiError> {
        let mut query: Vec<(&str, String)> = vec![
            ("skip", filter.skip.to_string()),
            ("limit", filter.limit.to_string()),
        ];
        if let Some(status) = filter.status {
            query.push(("status", status.to_string()));
        }
        if let Some(cliente_id) = filter.cliente_id {
            query.push(("cliente_id", cliente_id.to_string()));
        }

        self.get_json_with_query("/pedidos/", &query, AuthMode::Required)
            .await
    }

    /// `GET /pedidos/cliente/{id}` (authenticated).
    pub async fn list_pedidos_by_cliente(
        &self,
        cliente_id: ClienteId,
    ) -> Result<Vec<PedidoResumo>, ApiError> {
        self.get_json(&format!("/pedidos/cliente/{cliente_id}"), AuthMode::Required)
            .await
    }

    /// `GET /pedidos/{id}` (authenticated).
    pub async fn get_pedido(&self, id: PedidoId) -> Result<Pedido, ApiError> {
        self.get_json(&format!("/pedidos/{id}"), AuthMode::Required)
            .await
    }

    /// `GET /pedidos/numero/{numero}` (authenticated).
    pub async fn find_pedido_by_numero(&self, numero: &str) -> Result<Pedido, ApiError> {
        self.get_json(&format!("/pedidos/numero/{numero}"), AuthMode::Required)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Contato
    // ─────────────────────────────────────────────────────────────────────────

    /// `POST /contato/`.
    pub async fn send_contato(&self, contato: &ContatoCreate) -> Result<Contato, ApiError> {
        self.post_json("/contato/", contato, AuthMode::Public).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pagamentos
    // ─────────────────────────────────────────────────────────────────────────

    /// `GET /pagamentos/cliente/{id}` with paging (authenticated).
    pub async fn list_pagamentos_by_cliente(
        &self,
        cliente_id: ClienteId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<PagamentoResumo>, ApiError> {
        self.get_json_with_query(
            &format!("/pagamentos/cliente/{cliente_id}"),
            &[("skip", skip.to_string()), ("limit", limit.to_string())],
            AuthMode::Required,
        )
        .await
    }

    /// `GET /pagamentos/{id}` (authenticated).
    pub async fn get_pagamento(&self, id: PagamentoId) -> Result<Pagamento, ApiError> {
        self.get_json(&format!("/pagamentos/{id}"), AuthMode::Required)
            .await
    }

    /// `GET /pagamentos/{id}/historico` (authenticated).
    pub async fn get_pagamento_historico(
        &self,
        id: PagamentoId,
    ) -> Result<Vec<HistoricoPagamento>, ApiError> {
        self.get_json(&format!("/pagamentos/{id}/historico"), AuthMode::Required)
            .await
    }
}
