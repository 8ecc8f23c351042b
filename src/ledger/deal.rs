//! Referral deal aggregate
//!
//! One record per referral case: status history, distribution snapshots,
//! and the payment ledger. All three sequences are append-only audit
//! trails; nothing in them is ever edited or removed.

use serde::{Deserialize, Serialize};

use crate::ledger::{DealSnapshot, DealStatus, PaymentRecord, SlotPresence, StatusLog};

/// A referral deal and its full settlement history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferralDeal {
    /// External deal identifier (opaque to the core)
    pub deal_id: String,

    /// Latest lifecycle status
    #[serde(default)]
    pub current_status: DealStatus,

    /// Append-only status history
    #[serde(default)]
    pub status_logs: Vec<StatusLog>,

    /// Append-only distribution snapshots; the last entry is current
    #[serde(default)]
    pub deal_logs: Vec<DealSnapshot>,

    /// Append-only payment records, inbound and outbound
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,

    /// Member reference of the referring orbiter, if attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orbiter: Option<String>,

    /// Member reference of the orbiter's mentor, if attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orbiter_mentor: Option<String>,

    /// Member reference of the cosmo mentor, if attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cosmo_mentor: Option<String>,
}

impl ReferralDeal {
    /// Register a new referral deal in `Pending` status.
    pub fn new(
        deal_id: impl Into<String>,
        orbiter: Option<String>,
        orbiter_mentor: Option<String>,
        cosmo_mentor: Option<String>,
    ) -> Self {
        let mut deal = Self {
            deal_id: deal_id.into(),
            orbiter,
            orbiter_mentor,
            cosmo_mentor,
            ..Default::default()
        };
        // A fresh deal has no lock in its history, so this cannot fail.
        let _ = deal.set_status(DealStatus::Pending);
        deal
    }

    /// Which optional stakeholder roles are attached to this referral.
    pub fn slot_presence(&self) -> SlotPresence {
        SlotPresence {
            orbiter: self.orbiter.is_some(),
            orbiter_mentor: self.orbiter_mentor.is_some(),
            cosmo_mentor: self.cosmo_mentor.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_presence_tracks_attached_roles() {
        let deal = ReferralDeal::new("d-1", Some("orb".into()), None, Some("cosmo".into()));
        let presence = deal.slot_presence();

        assert!(presence.orbiter);
        assert!(!presence.orbiter_mentor);
        assert!(presence.cosmo_mentor);
    }

    #[test]
    fn test_new_deal_is_empty_apart_from_status() {
        let deal = ReferralDeal::new("d-1", None, None, None);

        assert!(deal.deal_logs.is_empty());
        assert!(deal.payments.is_empty());
        assert_eq!(deal.status_logs.len(), 1);
    }
}
