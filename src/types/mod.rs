//! Shared types for the settlement core.

pub mod error;

pub use error::{Result, SettlementError};
