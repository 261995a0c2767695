//! Repository layer: durable storage behind small contracts.
//!
//! # Responsibility
//! - Define the key-value contract and its SQLite/memory implementations.
//! - Map the workspace document and preferences onto stable keys.
//!
//! # Invariants
//! - Storage failures surface as `RepoError`; callers decide whether to
//!   degrade (loads) or log and continue (saves).

pub mod kv_repo;
pub mod workspace_store;
