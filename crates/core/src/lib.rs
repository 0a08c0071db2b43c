//! Doceria Core - Shared types library.
//!
//! This crate provides common types used across the Doceria client components:
//! - `client` - SDK layered over the bakery's REST backend
//! - `cli` - Command-line ordering tool
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
