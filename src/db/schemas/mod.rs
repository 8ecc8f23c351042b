//! Database schemas for the settlement core.
//!
//! Defines the MongoDB document structure for referral deal records.

mod deal;
mod metadata;

pub use deal::{ReferralDealDoc, DEAL_COLLECTION};
pub use metadata::Metadata;
