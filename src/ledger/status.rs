//! Deal lifecycle status
//!
//! Status transitions are operator-directed; the machine does not forbid
//! "backward" moves, since operators correct real mistakes. The one hard
//! rule: once the agreed percent has been transferred to UJB, the deal is
//! permanently locked and the status can never change again.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::ledger::deal::ReferralDeal;
use crate::types::{Result, SettlementError};

/// Lifecycle status of a referral deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
pub enum DealStatus {
    #[default]
    Pending,
    Reject,
    NotConnected,
    DiscussionInProgress,
    Hold,
    DealWon,
    WorkInProgress,
    WorkCompleted,
    PartPaymentTransferred,
    FullFinalPaymentReceived,
    /// Commission transferred to the organization; locks the deal ledger.
    AgreedPercentTransferredToUjb,
}

impl DealStatus {
    /// Whether this status permanently locks the deal ledger.
    pub fn is_lock_trigger(&self) -> bool {
        matches!(self, Self::AgreedPercentTransferredToUjb)
    }
}

/// One entry in a deal's append-only status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLog {
    pub status: DealStatus,
    pub at: DateTime<Utc>,
}

impl ReferralDeal {
    /// Move the deal to `status`, appending one status log entry.
    ///
    /// Fails with `DealLocked` once the lock-triggering status has ever
    /// appeared in the history. Setting the lock status itself is the last
    /// permitted transition.
    pub fn set_status(&mut self, status: DealStatus) -> Result<StatusLog> {
        if self.is_locked() {
            return Err(SettlementError::DealLocked(format!(
                "deal {}: status is frozen after commission transfer",
                self.deal_id
            )));
        }

        let entry = StatusLog {
            status,
            at: Utc::now(),
        };
        self.status_logs.push(entry.clone());
        self.current_status = status;
        Ok(entry)
    }
}
