//! Scenario tests for the Cliente resolution ladder.
//!
//! The directory is a scripted fake: each operation pops its next result
//! from a queue, and the call log asserts which strategies ran.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use doceria_client::account::{AccountService, ClienteDirectory};
use doceria_client::api::types::{Cliente, ClienteCreate, ClienteResumo};
use doceria_client::auth::AuthState;
use doceria_client::error::ApiError;
use doceria_client::storage::{KeyValueStore, MemoryStore, keys};
use doceria_core::ClienteId;

// =============================================================================
// Scripted fake directory
// =============================================================================

#[derive(Default)]
struct FakeDirectory {
    find_by_email: Mutex<VecDeque<Result<Cliente, ApiError>>>,
    search: Mutex<VecDeque<Result<Vec<ClienteResumo>, ApiError>>>,
    fetch: Mutex<VecDeque<Result<Cliente, ApiError>>>,
    create: Mutex<VecDeque<Result<Cliente, ApiError>>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeDirectory {
    fn new() -> Self {
        Self::default()
    }

    fn script_find(&self, result: Result<Cliente, ApiError>) {
        self.find_by_email.lock().unwrap().push_back(result);
    }

    fn script_search(&self, result: Result<Vec<ClienteResumo>, ApiError>) {
        self.search.lock().unwrap().push_back(result);
    }

    fn script_fetch(&self, result: Result<Cliente, ApiError>) {
        self.fetch.lock().unwrap().push_back(result);
    }

    fn script_create(&self, result: Result<Cliente, ApiError>) {
        self.create.lock().unwrap().push_back(result);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl ClienteDirectory for FakeDirectory {
    async fn find_by_email(&self, _email: &str) -> Result<Cliente, ApiError> {
        self.calls.lock().unwrap().push("find_by_email");
        self.find_by_email
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted call to find_by_email")
    }

    async fn search(&self, _term: &str) -> Result<Vec<ClienteResumo>, ApiError> {
        self.calls.lock().unwrap().push("search");
        self.search
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted call to search")
    }

    async fn fetch(&self, _id: ClienteId) -> Result<Cliente, ApiError> {
        self.calls.lock().unwrap().push("fetch");
        self.fetch
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted call to fetch")
    }

    async fn create(&self, _input: &ClienteCreate) -> Result<Cliente, ApiError> {
        self.calls.lock().unwrap().push("create");
        self.create
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted call to create")
    }
}

// =============================================================================
// Fixtures
// =============================================================================

const EMAIL: &str = "maria@example.com";

fn cliente(id: i32, email: &str) -> Cliente {
    let timestamp = NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    Cliente {
        id: ClienteId::new(id),
        name: "Maria".to_owned(),
        email: email.to_owned(),
        phone: None,
        cpf: None,
        address: None,
        number: None,
        complement: None,
        neighborhood: None,
        city: None,
        state: None,
        postal_code: None,
        birth_date: None,
        notes: None,
        active: true,
        created_at: timestamp,
        updated_at: timestamp,
    }
}

fn resumo(id: i32, email: &str) -> ClienteResumo {
    ClienteResumo {
        id: ClienteId::new(id),
        name: "Maria".to_owned(),
        email: email.to_owned(),
        phone: None,
        city: None,
        active: true,
    }
}

fn not_found() -> ApiError {
    ApiError::Http {
        status: 404,
        detail: "Cliente não encontrado.".to_owned(),
    }
}

fn server_error() -> ApiError {
    ApiError::Http {
        status: 500,
        detail: "Erro interno".to_owned(),
    }
}

/// An authenticated auth state whose stored user has the fixture email.
fn logged_in_auth() -> AuthState {
    let store = Arc::new(MemoryStore::new());
    store.set(keys::AUTH_TOKEN, "header.payload.signature").unwrap();
    store
        .set(
            keys::AUTH_USER,
            &format!(r#"{{"id":1,"email":"{EMAIL}","nome":"Maria"}}"#),
        )
        .unwrap();
    AuthState::new(store as Arc<dyn KeyValueStore>)
}

fn logged_out_auth() -> AuthState {
    AuthState::new(Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>)
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn existing_record_resolves_without_create() {
    let directory = FakeDirectory::new();
    directory.script_find(Ok(cliente(7, EMAIL)));

    let account = AccountService::new();
    let resolved = account.resolve(&directory, &logged_in_auth()).await.unwrap();

    assert_eq!(resolved.id, ClienteId::new(7));
    assert_eq!(directory.calls(), vec!["find_by_email"]);
}

#[tokio::test]
async fn missing_record_is_created() {
    let directory = FakeDirectory::new();
    directory.script_find(Err(not_found()));
    directory.script_search(Ok(Vec::new()));
    directory.script_create(Ok(cliente(8, EMAIL)));

    let account = AccountService::new();
    let resolved = account.resolve(&directory, &logged_in_auth()).await.unwrap();

    assert_eq!(resolved.id, ClienteId::new(8));
    assert_eq!(directory.calls(), vec!["find_by_email", "search", "create"]);
}

#[tokio::test]
async fn fuzzy_search_matches_email_case_insensitively() {
    let directory = FakeDirectory::new();
    directory.script_find(Err(not_found()));
    directory.script_search(Ok(vec![
        resumo(3, "other@example.com"),
        resumo(4, "MARIA@EXAMPLE.COM"),
    ]));
    directory.script_fetch(Ok(cliente(4, EMAIL)));

    let account = AccountService::new();
    let resolved = account.resolve(&directory, &logged_in_auth()).await.unwrap();

    assert_eq!(resolved.id, ClienteId::new(4));
    assert_eq!(directory.calls(), vec!["find_by_email", "search", "fetch"]);
}

#[tokio::test]
async fn exact_lookup_failure_degrades_to_search() {
    let directory = FakeDirectory::new();
    // A non-404, non-401 failure is logged and swallowed.
    directory.script_find(Err(server_error()));
    directory.script_search(Ok(vec![resumo(5, EMAIL)]));
    directory.script_fetch(Ok(cliente(5, EMAIL)));

    let account = AccountService::new();
    let resolved = account.resolve(&directory, &logged_in_auth()).await.unwrap();

    assert_eq!(resolved.id, ClienteId::new(5));
}

#[tokio::test]
async fn duplicate_on_create_recovers_via_exact_lookup() {
    let directory = FakeDirectory::new();
    directory.script_find(Err(not_found()));
    directory.script_search(Ok(Vec::new()));
    directory.script_create(Err(ApiError::Duplicate("Email já cadastrado.".to_owned())));
    directory.script_find(Ok(cliente(9, EMAIL)));

    let account = AccountService::new();
    let resolved = account.resolve(&directory, &logged_in_auth()).await.unwrap();

    assert_eq!(resolved.id, ClienteId::new(9));
    assert_eq!(
        directory.calls(),
        vec!["find_by_email", "search", "create", "find_by_email"]
    );
}

#[tokio::test]
async fn duplicate_recovery_falls_back_to_search() {
    let directory = FakeDirectory::new();
    directory.script_find(Err(not_found()));
    directory.script_search(Ok(Vec::new()));
    directory.script_create(Err(ApiError::Duplicate("Email já cadastrado.".to_owned())));
    directory.script_find(Err(server_error()));
    directory.script_search(Ok(vec![resumo(2, EMAIL)]));
    directory.script_fetch(Ok(cliente(2, EMAIL)));

    let account = AccountService::new();
    let resolved = account.resolve(&directory, &logged_in_auth()).await.unwrap();

    assert_eq!(resolved.id, ClienteId::new(2));
}

#[tokio::test]
async fn unrecoverable_duplicate_is_a_recovery_error() {
    let directory = FakeDirectory::new();
    directory.script_find(Err(not_found()));
    directory.script_search(Ok(Vec::new()));
    directory.script_create(Err(ApiError::Duplicate("Email já cadastrado.".to_owned())));
    directory.script_find(Err(server_error()));
    directory.script_search(Ok(Vec::new()));

    let account = AccountService::new();
    let err = account
        .resolve(&directory, &logged_in_auth())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Recovery(_)));
}

#[tokio::test]
async fn expired_session_on_lookup_propagates() {
    let directory = FakeDirectory::new();
    directory.script_find(Err(ApiError::Session("Não autenticado".to_owned())));

    let account = AccountService::new();
    let err = account
        .resolve(&directory, &logged_in_auth())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Session(_)));
    // No degradation after an auth failure.
    assert_eq!(directory.calls(), vec!["find_by_email"]);
}

#[tokio::test]
async fn expired_session_on_create_propagates() {
    let directory = FakeDirectory::new();
    directory.script_find(Err(not_found()));
    directory.script_search(Ok(Vec::new()));
    directory.script_create(Err(ApiError::Session("Não autenticado".to_owned())));

    let account = AccountService::new();
    let err = account
        .resolve(&directory, &logged_in_auth())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Session(_)));
}

#[tokio::test]
async fn unexpected_create_error_propagates_unchanged() {
    let directory = FakeDirectory::new();
    directory.script_find(Err(not_found()));
    directory.script_search(Ok(Vec::new()));
    directory.script_create(Err(server_error()));

    let account = AccountService::new();
    let err = account
        .resolve(&directory, &logged_in_auth())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Http { status: 500, .. }));
}

#[tokio::test]
async fn unauthenticated_user_fails_without_directory_calls() {
    let directory = FakeDirectory::new();

    let account = AccountService::new();
    let err = account
        .resolve(&directory, &logged_out_auth())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Session(_)));
    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn resolution_is_memoized_per_session() {
    let directory = FakeDirectory::new();
    directory.script_find(Ok(cliente(7, EMAIL)));

    let auth = logged_in_auth();
    let account = AccountService::new();

    let first = account.resolve(&directory, &auth).await.unwrap();
    // Second call must not touch the directory: nothing else is scripted.
    let second = account.resolve(&directory, &auth).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(directory.calls(), vec!["find_by_email"]);
}

#[tokio::test]
async fn reset_drops_the_memoized_record() {
    let directory = FakeDirectory::new();
    directory.script_find(Ok(cliente(7, EMAIL)));
    directory.script_find(Ok(cliente(7, EMAIL)));

    let auth = logged_in_auth();
    let account = AccountService::new();

    account.resolve(&directory, &auth).await.unwrap();
    account.reset();
    assert!(account.current_cliente().is_none());

    account.resolve(&directory, &auth).await.unwrap();
    assert_eq!(directory.calls(), vec!["find_by_email", "find_by_email"]);
}
