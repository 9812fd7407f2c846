//! Concurrent account mutation engine.
//!
//! Balance changes go through a per-account exclusive hold so two withdrawals racing on the same
//! account can never both observe sufficient funds. Lock and unlock are administrative flag
//! flips that take the plain, non-blocking path.

#![deny(missing_docs)]

pub mod account;
pub mod amount;
pub mod config;
pub mod csv;
pub mod engine;
pub mod errors;
pub mod store;

/// Account identifier. Unique across the whole store
pub type AccountId = u64;
