//! Doceria Client - SDK for the bakery ordering backend.
//!
//! This crate is the client-side layer between the Doceria REST backend and a
//! presentation surface (the `doceria-cli` binary, or any future UI). It owns
//! three pieces of client-local state and the plumbing around them:
//!
//! - [`auth::AuthState`] - JWT-backed login state, persisted across runs
//! - [`cart::CartStore`] - the shopping cart, persisted under a single key
//! - [`account::AccountService`] - the per-session resolved Cliente record
//!
//! All durable state lives in a [`storage::KeyValueStore`] (a JSON file by
//! default), mirroring the single-origin key-value model the backend's web
//! front-end uses. Writes are whole-value replacements; concurrent processes
//! race last-write-wins, which the merge-by-key cart semantics tolerate.
//!
//! # Example
//!
//! ```rust,ignore
//! use doceria_client::state::AppState;
//!
//! let app = AppState::from_env()?;
//! app.auth().login(app.api(), "maria@example.com", "s3nha123").await?;
//! let dashboard = app.account().dashboard(app.api(), app.auth()).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod api;
pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod listeners;
pub mod state;
pub mod storage;

pub use account::AccountService;
pub use api::ApiClient;
pub use auth::AuthState;
pub use cart::CartStore;
pub use config::ClientConfig;
pub use error::ApiError;
pub use state::AppState;
