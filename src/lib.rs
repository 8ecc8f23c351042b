//! Referral settlement ledger
//!
//! Core settlement engine for the referral admin dashboard: derives a
//! multi-party revenue split from a negotiated deal value, records inbound
//! and outbound payments against that split, reconciles paid-vs-remaining
//! balances per stakeholder, and locks the distribution once the
//! organization's commission has been transferred.
//!
//! ## Components
//!
//! - **ledger**: the domain model — distribution calculator, snapshot
//!   history, payment records, balance reconciliation, lifecycle status
//! - **store**: persistence seam (`DealStore`) with MongoDB and in-memory
//!   implementations
//! - **service**: the facade the admin UI / API layer calls

pub mod config;
pub mod db;
pub mod ledger;
pub mod logging;
pub mod service;
pub mod store;
pub mod types;

pub use config::Args;
pub use service::{NewPayment, SettlementService};
pub use types::{Result, SettlementError};
