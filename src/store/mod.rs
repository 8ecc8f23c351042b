//! Deal persistence seam
//!
//! The core never reaches into process-wide database state; callers hand
//! it a [`DealStore`]. Saves carry the revision the caller loaded, so a
//! write that raced with another save of the same deal surfaces as
//! `ConcurrentModification` instead of silently clobbering it. A failed
//! save leaves the stored record unchanged.

pub mod mongo;

use async_trait::async_trait;
use bson::DateTime;
use dashmap::DashMap;

use crate::db::schemas::ReferralDealDoc;
use crate::types::{Result, SettlementError};

pub use mongo::MongoDealStore;

/// Load/save interface over referral deal records.
///
/// Operations against different deals are independent; writes against the
/// same deal are linearized by the revision check (and additionally by the
/// service facade's per-deal mutex within one process).
#[async_trait]
pub trait DealStore: Send + Sync {
    /// Load a deal by its external identifier.
    async fn load(&self, deal_id: &str) -> Result<Option<ReferralDealDoc>>;

    /// Insert a newly registered deal; duplicate deal ids are rejected.
    async fn insert(&self, doc: ReferralDealDoc) -> Result<()>;

    /// Persist `doc` if the stored revision still equals `doc.revision`,
    /// bumping the revision; otherwise `ConcurrentModification`.
    async fn save(&self, doc: &ReferralDealDoc) -> Result<()>;

    /// All deals, for dashboard listings.
    async fn list(&self) -> Result<Vec<ReferralDealDoc>>;
}

/// In-memory store used by unit tests and local tooling.
#[derive(Default)]
pub struct MemoryDealStore {
    deals: DashMap<String, ReferralDealDoc>,
}

impl MemoryDealStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DealStore for MemoryDealStore {
    async fn load(&self, deal_id: &str) -> Result<Option<ReferralDealDoc>> {
        Ok(self.deals.get(deal_id).map(|entry| entry.clone()))
    }

    async fn insert(&self, doc: ReferralDealDoc) -> Result<()> {
        let deal_id = doc.deal.deal_id.clone();
        match self.deals.entry(deal_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(SettlementError::Database(
                format!("deal {} already exists", deal_id),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(doc);
                Ok(())
            }
        }
    }

    async fn save(&self, doc: &ReferralDealDoc) -> Result<()> {
        // get_mut holds the shard lock, making the compare-and-bump atomic
        let mut entry = self
            .deals
            .get_mut(&doc.deal.deal_id)
            .ok_or_else(|| SettlementError::NotFound(format!("deal {}", doc.deal.deal_id)))?;

        if entry.revision != doc.revision {
            return Err(SettlementError::ConcurrentModification(format!(
                "deal {} is at revision {}, write expected {}",
                doc.deal.deal_id, entry.revision, doc.revision
            )));
        }

        let mut updated = doc.clone();
        updated.revision = doc.revision + 1;
        updated.metadata.updated_at = Some(DateTime::now());
        *entry = updated;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ReferralDealDoc>> {
        Ok(self.deals.iter().map(|entry| entry.clone()).collect())
    }
}
