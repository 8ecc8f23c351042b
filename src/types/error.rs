//! Error types for the settlement core.
//!
//! This is financial data: every failure surfaces to the immediate caller,
//! never a silent recovery. `ConcurrentModification` is the only variant a
//! caller is expected to retry automatically (re-read, recompute, re-submit);
//! everything else needs operator intervention.

use thiserror::Error;

/// Errors surfaced by the settlement ledger.
#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid split configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Deal locked: {0}")]
    DealLocked(String),

    #[error("Unknown inbound payment: {0}")]
    UnknownInbound(String),

    #[error("Overpayment: {0}")]
    OverPayment(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for SettlementError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for SettlementError {
    fn from(err: serde_json::Error) -> Self {
        Self::Database(format!("serialization error: {}", err))
    }
}

/// Result type alias for settlement operations
pub type Result<T> = std::result::Result<T, SettlementError>;
