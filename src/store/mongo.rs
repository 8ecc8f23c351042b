//! MongoDB-backed deal store

use async_trait::async_trait;
use bson::doc;

use crate::db::schemas::{ReferralDealDoc, DEAL_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::store::DealStore;
use crate::types::Result;

/// [`DealStore`] over the `referral_deals` collection.
///
/// The revision check rides on `replace_one` with the expected revision
/// pinned in the filter, which MongoDB applies atomically per document.
#[derive(Clone)]
pub struct MongoDealStore {
    collection: MongoCollection<ReferralDealDoc>,
}

impl MongoDealStore {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            collection: client.collection(DEAL_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl DealStore for MongoDealStore {
    async fn load(&self, deal_id: &str) -> Result<Option<ReferralDealDoc>> {
        self.collection.find_one(doc! { "deal_id": deal_id }).await
    }

    async fn insert(&self, doc: ReferralDealDoc) -> Result<()> {
        // The unique deal_id index turns duplicate registration into an error
        self.collection.insert_one(doc).await.map(|_| ())
    }

    async fn save(&self, doc: &ReferralDealDoc) -> Result<()> {
        let mut replacement = doc.clone();
        replacement.revision = doc.revision + 1;
        self.collection
            .replace_versioned(
                doc! { "deal_id": &doc.deal.deal_id, "revision": doc.revision },
                replacement,
            )
            .await
    }

    async fn list(&self) -> Result<Vec<ReferralDealDoc>> {
        self.collection.find_many(doc! {}).await
    }
}
