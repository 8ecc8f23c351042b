//! Domain model for referral deal settlement.
//!
//! Everything in this module is pure computation over the deal record:
//! no I/O, no clocks beyond timestamping appended entries, no logging to
//! user-facing channels. Persistence lives in `store`.

pub mod deal;
pub mod distribution;
pub mod payment;
pub mod reconcile;
pub mod snapshot;
pub mod status;

pub use deal::ReferralDeal;
pub use distribution::{compute_shares, ShareSet, Slot, SlotPresence, SplitConfig};
pub use payment::{InboundMeta, OutboundMeta, PaymentDirection, PaymentRecord};
pub use reconcile::{InboundSummary, ReconciliationReport, SlotBalance};
pub use snapshot::DealSnapshot;
pub use status::{DealStatus, StatusLog};
