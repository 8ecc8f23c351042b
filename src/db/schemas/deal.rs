//! Referral deal document schema
//!
//! Persisted form of [`ReferralDeal`]: the domain record plus document
//! metadata and the optimistic-concurrency revision counter.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::ledger::ReferralDeal;

/// Collection name for referral deals
pub const DEAL_COLLECTION: &str = "referral_deals";

/// Referral deal document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ReferralDealDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Optimistic concurrency counter; bumped on every successful save
    #[serde(default)]
    pub revision: i64,

    /// The deal record itself
    #[serde(flatten)]
    pub deal: ReferralDeal,
}

impl ReferralDealDoc {
    /// Wrap a freshly registered deal for persistence.
    pub fn new(deal: ReferralDeal) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            revision: 0,
            deal,
        }
    }
}

impl IntoIndexes for ReferralDealDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Unique index on the external deal identifier
            (
                doc! { "deal_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("deal_id_unique".to_string())
                        .build(),
                ),
            ),
            // Index on status for dashboard filtering
            (
                doc! { "current_status": 1 },
                Some(
                    IndexOptions::builder()
                        .name("current_status_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for ReferralDealDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
