//! Deal ledger: versioned distribution snapshots
//!
//! Every revision of the negotiated deal value appends one immutable
//! snapshot; the most recently appended snapshot is the active
//! distribution. Prior snapshots stay in the history for audit. Once the
//! organization's commission has been transferred the history is locked
//! and no further snapshot may be appended.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::deal::ReferralDeal;
use crate::ledger::distribution::{compute_shares, ShareSet, SplitConfig};
use crate::types::{Result, SettlementError};

/// One immutable computed distribution of a deal value across slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealSnapshot {
    #[serde(with = "rust_decimal::serde::str")]
    pub deal_value: Decimal,

    /// Settlement base; equals `deal_value` unless a deduction rule applies.
    #[serde(with = "rust_decimal::serde::str")]
    pub agreed_amount: Decimal,

    /// Per-slot share amounts; total exactly `agreed_amount`.
    pub shares: ShareSet,

    pub created_at: DateTime<Utc>,
}

impl ReferralDeal {
    /// Whether the deal ledger is permanently locked.
    ///
    /// True iff the lock-triggering status is current or appears anywhere
    /// in the status history.
    pub fn is_locked(&self) -> bool {
        self.current_status.is_lock_trigger()
            || self.status_logs.iter().any(|log| log.status.is_lock_trigger())
    }

    /// The active distribution snapshot, if any has been committed.
    pub fn current_snapshot(&self) -> Option<&DealSnapshot> {
        self.deal_logs.last()
    }

    /// Compute and append a new distribution snapshot for `deal_value`.
    ///
    /// Fails with `DealLocked` once the commission has been transferred;
    /// no recomputation is permitted after lock.
    pub fn append_snapshot(
        &mut self,
        deal_value: Decimal,
        config: &SplitConfig,
    ) -> Result<DealSnapshot> {
        if self.is_locked() {
            return Err(SettlementError::DealLocked(format!(
                "deal {}: distribution is frozen after commission transfer",
                self.deal_id
            )));
        }

        let shares = compute_shares(deal_value, config, &self.slot_presence())?;
        let snapshot = DealSnapshot {
            deal_value,
            agreed_amount: deal_value,
            shares,
            created_at: Utc::now(),
        };
        self.deal_logs.push(snapshot.clone());
        Ok(snapshot)
    }
}
