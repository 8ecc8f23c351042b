//! Settlement service facade
//!
//! The one entry point the admin UI / API layer calls. Write operations
//! take a per-deal mutex across load-modify-save, so within one process a
//! lock transition or an overpayment guard cannot be raced past; the
//! store's revision check covers writers in other processes. Reads never
//! mutate anything.

use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::schemas::ReferralDealDoc;
use crate::ledger::{
    compute_shares, DealSnapshot, DealStatus, InboundMeta, PaymentRecord, ReconciliationReport,
    ReferralDeal, ShareSet, Slot, SplitConfig, StatusLog,
};
use crate::store::DealStore;
use crate::types::{Result, SettlementError};

/// A payment to record against a deal.
#[derive(Debug, Clone)]
pub enum NewPayment {
    /// Money received from the deal counterparty.
    Inbound {
        amount: Decimal,
        tds_amount: Option<Decimal>,
        logical_amount: Option<Decimal>,
        mode_of_payment: Option<String>,
    },
    /// Payout to a stakeholder slot, drawn against one inbound.
    Outbound {
        inbound_id: Uuid,
        slot: Slot,
        amount: Decimal,
        mode_of_payment: Option<String>,
    },
}

/// Settlement operations over a [`DealStore`].
pub struct SettlementService<S: DealStore> {
    store: Arc<S>,
    split: SplitConfig,
    deal_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S: DealStore> SettlementService<S> {
    pub fn new(store: Arc<S>, split: SplitConfig) -> Self {
        Self {
            store,
            split,
            deal_locks: DashMap::new(),
        }
    }

    fn lock_for(&self, deal_id: &str) -> Arc<Mutex<()>> {
        self.deal_locks
            .entry(deal_id.to_string())
            .or_default()
            .value()
            .clone()
    }

    async fn load_required(&self, deal_id: &str) -> Result<ReferralDealDoc> {
        self.store
            .load(deal_id)
            .await?
            .ok_or_else(|| SettlementError::NotFound(format!("deal {}", deal_id)))
    }

    /// Register a new referral deal in `Pending` status.
    pub async fn create_deal(
        &self,
        deal_id: &str,
        orbiter: Option<String>,
        orbiter_mentor: Option<String>,
        cosmo_mentor: Option<String>,
    ) -> Result<ReferralDealDoc> {
        let doc = ReferralDealDoc::new(ReferralDeal::new(
            deal_id,
            orbiter,
            orbiter_mentor,
            cosmo_mentor,
        ));
        self.store.insert(doc.clone()).await?;
        info!(deal_id, "registered referral deal");
        Ok(doc)
    }

    /// Load a deal record.
    pub async fn get_deal(&self, deal_id: &str) -> Result<ReferralDealDoc> {
        self.load_required(deal_id).await
    }

    /// All deal records, for dashboard listings.
    pub async fn list_deals(&self) -> Result<Vec<ReferralDealDoc>> {
        self.store.list().await
    }

    /// Preview the share split for `deal_value`. Pure, writes nothing.
    pub async fn propose_distribution(&self, deal_id: &str, deal_value: Decimal) -> Result<ShareSet> {
        let doc = self.load_required(deal_id).await?;
        compute_shares(deal_value, &self.split, &doc.deal.slot_presence())
    }

    /// Commit a new distribution snapshot for `deal_value`.
    pub async fn commit_distribution(
        &self,
        deal_id: &str,
        deal_value: Decimal,
    ) -> Result<DealSnapshot> {
        let lock = self.lock_for(deal_id);
        let _guard = lock.lock().await;

        let mut doc = self.load_required(deal_id).await?;
        let snapshot = doc.deal.append_snapshot(deal_value, &self.split)?;
        self.store.save(&doc).await?;

        info!(deal_id, deal_value = %deal_value, "committed distribution snapshot");
        Ok(snapshot)
    }

    /// Record an inbound or outbound payment.
    pub async fn record_payment(
        &self,
        deal_id: &str,
        payment: NewPayment,
    ) -> Result<PaymentRecord> {
        let lock = self.lock_for(deal_id);
        let _guard = lock.lock().await;

        let mut doc = self.load_required(deal_id).await?;
        let record = match payment {
            NewPayment::Inbound {
                amount,
                tds_amount,
                logical_amount,
                mode_of_payment,
            } => doc.deal.record_inbound(
                amount,
                InboundMeta {
                    tds_amount,
                    logical_amount,
                },
                mode_of_payment,
            )?,
            NewPayment::Outbound {
                inbound_id,
                slot,
                amount,
                mode_of_payment,
            } => doc
                .deal
                .record_outbound(inbound_id, slot, amount, mode_of_payment)?,
        };
        self.store.save(&doc).await?;

        info!(
            deal_id,
            payment_id = %record.id,
            direction = ?record.direction,
            amount = %record.amount,
            "recorded payment"
        );
        Ok(record)
    }

    /// Build the paid/remaining reconciliation report. Read-only.
    pub async fn get_reconciliation(&self, deal_id: &str) -> Result<ReconciliationReport> {
        let doc = self.load_required(deal_id).await?;
        debug!(deal_id, "built reconciliation report");
        Ok(doc.deal.reconcile())
    }

    /// Move the deal to a new lifecycle status.
    pub async fn set_status(&self, deal_id: &str, status: DealStatus) -> Result<StatusLog> {
        let lock = self.lock_for(deal_id);
        let _guard = lock.lock().await;

        let mut doc = self.load_required(deal_id).await?;
        let entry = doc.deal.set_status(status)?;
        self.store.save(&doc).await?;

        info!(deal_id, status = ?entry.status, "deal status changed");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDealStore;
    use rust_decimal_macros::dec;

    fn service() -> SettlementService<MemoryDealStore> {
        SettlementService::new(
            Arc::new(MemoryDealStore::new()),
            SplitConfig::new(dec!(10), dec!(5), dec!(5)),
        )
    }

    async fn seeded(svc: &SettlementService<MemoryDealStore>) {
        svc.create_deal(
            "deal-1",
            Some("orb".into()),
            Some("orb-mentor".into()),
            Some("cosmo".into()),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let svc = service();
        seeded(&svc).await;

        let doc = svc.get_deal("deal-1").await.unwrap();
        assert_eq!(doc.deal.current_status, DealStatus::Pending);

        let err = svc.get_deal("missing").await.unwrap_err();
        assert!(matches!(err, SettlementError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_propose_writes_nothing() {
        let svc = service();
        seeded(&svc).await;

        let shares = svc
            .propose_distribution("deal-1", dec!(100000))
            .await
            .unwrap();
        assert_eq!(shares.orbiter, dec!(10000));

        let doc = svc.get_deal("deal-1").await.unwrap();
        assert!(doc.deal.deal_logs.is_empty());
        assert_eq!(doc.revision, 0);
    }

    #[tokio::test]
    async fn test_full_settlement_flow() {
        let svc = service();
        seeded(&svc).await;

        svc.commit_distribution("deal-1", dec!(100000)).await.unwrap();
        let inbound = svc
            .record_payment(
                "deal-1",
                NewPayment::Inbound {
                    amount: dec!(47500),
                    tds_amount: Some(dec!(2500)),
                    logical_amount: None,
                    mode_of_payment: Some("NEFT".into()),
                },
            )
            .await
            .unwrap();
        svc.record_payment(
            "deal-1",
            NewPayment::Outbound {
                inbound_id: inbound.id,
                slot: Slot::Orbiter,
                amount: dec!(8000),
                mode_of_payment: None,
            },
        )
        .await
        .unwrap();

        let report = svc.get_reconciliation("deal-1").await.unwrap();
        assert_eq!(report.total_paid_in, dec!(50000));
        let orbiter = report
            .slots
            .iter()
            .find(|b| b.slot == Slot::Orbiter)
            .unwrap();
        assert_eq!(orbiter.remaining, dec!(2000));
    }

    #[tokio::test]
    async fn test_commit_rejected_after_lock() {
        let svc = service();
        seeded(&svc).await;

        svc.commit_distribution("deal-1", dec!(100000)).await.unwrap();
        svc.set_status("deal-1", DealStatus::AgreedPercentTransferredToUjb)
            .await
            .unwrap();

        let err = svc
            .commit_distribution("deal-1", dec!(150000))
            .await
            .unwrap_err();
        assert!(matches!(err, SettlementError::DealLocked(_)));

        let doc = svc.get_deal("deal-1").await.unwrap();
        assert_eq!(
            doc.deal.current_snapshot().unwrap().deal_value,
            dec!(100000)
        );
    }

    #[tokio::test]
    async fn test_concurrent_payouts_cannot_exceed_share() {
        let svc = service();
        seeded(&svc).await;

        svc.commit_distribution("deal-1", dec!(100000)).await.unwrap();
        let inbound = svc
            .record_payment(
                "deal-1",
                NewPayment::Inbound {
                    amount: dec!(100000),
                    tds_amount: None,
                    logical_amount: None,
                    mode_of_payment: None,
                },
            )
            .await
            .unwrap();

        // Orbiter share is 10000; two concurrent 6000 payouts must not
        // both pass the overpayment check.
        let payout = |amount| {
            svc.record_payment(
                "deal-1",
                NewPayment::Outbound {
                    inbound_id: inbound.id,
                    slot: Slot::Orbiter,
                    amount,
                    mode_of_payment: None,
                },
            )
        };
        let (a, b) = tokio::join!(payout(dec!(6000)), payout(dec!(6000)));

        assert!(a.is_ok() != b.is_ok(), "exactly one payout must succeed");
        let failed = if a.is_err() { a } else { b };
        assert!(matches!(
            failed.unwrap_err(),
            SettlementError::OverPayment(_)
        ));
    }

    #[tokio::test]
    async fn test_status_log_grows_monotonically() {
        let svc = service();
        seeded(&svc).await;

        svc.set_status("deal-1", DealStatus::DealWon).await.unwrap();
        svc.set_status("deal-1", DealStatus::WorkInProgress)
            .await
            .unwrap();

        let doc = svc.get_deal("deal-1").await.unwrap();
        assert_eq!(doc.deal.status_logs.len(), 3);
        assert_eq!(doc.revision, 2);
    }
}
