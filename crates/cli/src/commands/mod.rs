//! Command implementations, one module per subcommand group.

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod contato;
pub mod order;
