//! Vault module — credential record storage.
//!
//! This module provides:
//! - `Credential` records and their decrypted `CredentialView` (`credential`)
//! - The JSON store file layout with atomic writes (`format`)
//! - High-level `CredentialStore` for per-user CRUD and search (`store`)

pub mod credential;
pub mod format;
pub mod store;

// Re-export the most commonly used items.
pub use credential::{Credential, CredentialUpdate, CredentialView, NewCredential};
pub use store::CredentialStore;
