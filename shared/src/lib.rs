//! Shared types for the Uniq catalog client
//!
//! Common types used across crates: domain models and the
//! request/response DTOs spoken by the remote catalog/auth API.

pub mod client;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
