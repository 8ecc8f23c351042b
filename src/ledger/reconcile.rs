//! Balance reconciliation
//!
//! A pure read over the payment ledger and the current distribution
//! snapshot: per-inbound gross amounts, per-slot paid/remaining balances,
//! and deal-level aggregates. Never writes; identical inputs always yield
//! the identical report. The outbound overpayment guard uses the same
//! arithmetic (`paid_for` / `remaining_for`), so the write-time check and
//! this report cannot drift apart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::deal::ReferralDeal;
use crate::ledger::distribution::Slot;
use crate::ledger::payment::PaymentDirection;

/// Share, paid, and remaining amounts for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotBalance {
    pub slot: Slot,
    #[serde(with = "rust_decimal::serde::str")]
    pub share: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub paid: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub remaining: Decimal,
}

/// One inbound payment with its per-slot payout balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundSummary {
    pub inbound_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount_received: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub tds_amount: Option<Decimal>,
    /// Gross logical amount of this inbound.
    #[serde(with = "rust_decimal::serde::str")]
    pub logical_amount: Decimal,
    pub slots: Vec<SlotBalance>,
}

/// Full paid/remaining picture of one deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub deal_id: String,
    /// Settlement base from the current snapshot; zero when none committed.
    #[serde(with = "rust_decimal::serde::str")]
    pub agreed_amount: Decimal,
    /// Sum of inbound gross logical amounts.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_paid_in: Decimal,
    /// `agreed_amount - total_paid_in`; negative when overcollected.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_remaining_agreed: Decimal,
    /// Per-slot lifetime balances across all inbound records.
    pub slots: Vec<SlotBalance>,
    pub inbounds: Vec<InboundSummary>,
}

impl ReferralDeal {
    /// Cumulative outbound amount for one slot across all inbounds.
    pub fn lifetime_paid(&self, slot: Slot) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.outbound.as_ref().is_some_and(|o| o.slot == slot))
            .map(|p| p.amount)
            .sum()
    }

    /// Build the reconciliation report. Pure read, no writes.
    pub fn reconcile(&self) -> ReconciliationReport {
        let shares = self
            .current_snapshot()
            .map(|s| s.shares.clone())
            .unwrap_or_else(crate::ledger::ShareSet::zero);
        let agreed_amount = self
            .current_snapshot()
            .map(|s| s.agreed_amount)
            .unwrap_or(Decimal::ZERO);

        let slots = Slot::ALL
            .iter()
            .map(|&slot| {
                let share = shares.get(slot);
                let paid = self.lifetime_paid(slot);
                SlotBalance {
                    slot,
                    share,
                    paid,
                    remaining: (share - paid).max(Decimal::ZERO),
                }
            })
            .collect();

        let inbounds: Vec<InboundSummary> = self
            .payments
            .iter()
            .filter(|p| p.direction == PaymentDirection::Inbound)
            .map(|record| {
                let per_slot = Slot::ALL
                    .iter()
                    .map(|&slot| {
                        let share = shares.get(slot);
                        let paid = self.paid_for(record.id, slot);
                        SlotBalance {
                            slot,
                            share,
                            paid,
                            remaining: (share - paid).max(Decimal::ZERO),
                        }
                    })
                    .collect();
                InboundSummary {
                    inbound_id: record.id,
                    amount_received: record.amount,
                    tds_amount: record.inbound.as_ref().and_then(|m| m.tds_amount),
                    logical_amount: record.gross_amount(),
                    slots: per_slot,
                }
            })
            .collect();

        let total_paid_in: Decimal = inbounds.iter().map(|i| i.logical_amount).sum();

        ReconciliationReport {
            deal_id: self.deal_id.clone(),
            agreed_amount,
            total_paid_in,
            total_remaining_agreed: agreed_amount - total_paid_in,
            slots,
            inbounds,
        }
    }
}
