//! Payment ledger
//!
//! Append-only record of monetary movements on a deal: inbound transfers
//! from the deal counterparty to the organization, and outbound payouts
//! from the organization to stakeholder slots, each payout drawn against
//! exactly one inbound record. Records are never mutated or deleted; they
//! are the financial audit trail.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::deal::ReferralDeal;
use crate::ledger::distribution::Slot;
use crate::types::{Result, SettlementError};

/// Direction of a monetary movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentDirection {
    Inbound,
    Outbound,
}

/// Extra detail on an inbound (deal-to-organization) transfer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundMeta {
    /// Withheld tax deduction, when the received amount is net of TDS.
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub tds_amount: Option<Decimal>,

    /// Gross amount before deduction, when the operator supplies it.
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub logical_amount: Option<Decimal>,
}

/// Link from an outbound payout to the inbound it is drawn against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMeta {
    /// Inbound record this payout draws on.
    pub belongs_to_inbound: Uuid,

    /// Stakeholder slot being paid.
    pub slot: Slot,
}

/// One append-only payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub direction: PaymentDirection,

    /// Amount received (inbound) or amount paid out (outbound);
    /// strictly positive.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbound: Option<InboundMeta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound: Option<OutboundMeta>,

    /// Free-form mode-of-payment descriptor (NEFT, UPI, cheque, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_of_payment: Option<String>,

    pub recorded_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Gross value of an inbound record: the explicit logical amount when
    /// present, else received plus withheld TDS, else received as-is.
    pub fn gross_amount(&self) -> Decimal {
        match &self.inbound {
            Some(meta) => meta
                .logical_amount
                .unwrap_or_else(|| self.amount + meta.tds_amount.unwrap_or(Decimal::ZERO)),
            None => self.amount,
        }
    }
}

impl ReferralDeal {
    /// Look up an inbound record of this deal by id.
    pub fn find_inbound(&self, inbound_id: Uuid) -> Option<&PaymentRecord> {
        self.payments
            .iter()
            .find(|p| p.direction == PaymentDirection::Inbound && p.id == inbound_id)
    }

    /// Cumulative outbound amount for one (inbound, slot) pair.
    pub fn paid_for(&self, inbound_id: Uuid, slot: Slot) -> Decimal {
        self.payments
            .iter()
            .filter(|p| {
                p.outbound
                    .as_ref()
                    .is_some_and(|o| o.belongs_to_inbound == inbound_id && o.slot == slot)
            })
            .map(|p| p.amount)
            .sum()
    }

    /// Remaining payable to `slot` drawn against `inbound_id`: the slot's
    /// share in the current snapshot minus payouts already drawn on that
    /// pair, clamped at zero.
    pub fn remaining_for(&self, inbound_id: Uuid, slot: Slot) -> Decimal {
        let share = self
            .current_snapshot()
            .map(|s| s.shares.get(slot))
            .unwrap_or(Decimal::ZERO);
        (share - self.paid_for(inbound_id, slot)).max(Decimal::ZERO)
    }

    /// Record an inbound transfer from the deal counterparty.
    pub fn record_inbound(
        &mut self,
        amount: Decimal,
        meta: InboundMeta,
        mode_of_payment: Option<String>,
    ) -> Result<PaymentRecord> {
        if amount <= Decimal::ZERO {
            return Err(SettlementError::InvalidAmount(format!(
                "inbound amount must be positive, got {}",
                amount
            )));
        }

        let record = PaymentRecord {
            id: Uuid::new_v4(),
            direction: PaymentDirection::Inbound,
            amount,
            inbound: Some(meta),
            outbound: None,
            mode_of_payment,
            recorded_at: Utc::now(),
        };
        self.payments.push(record.clone());
        Ok(record)
    }

    /// Record a payout to a stakeholder slot, drawn against one inbound.
    ///
    /// Fails with `UnknownInbound` when `inbound_id` does not name an
    /// inbound record of this deal, and with `OverPayment` when the amount
    /// exceeds the remaining balance for the (inbound, slot) pair at the
    /// time of the call.
    pub fn record_outbound(
        &mut self,
        inbound_id: Uuid,
        slot: Slot,
        amount: Decimal,
        mode_of_payment: Option<String>,
    ) -> Result<PaymentRecord> {
        if amount <= Decimal::ZERO {
            return Err(SettlementError::InvalidAmount(format!(
                "outbound amount must be positive, got {}",
                amount
            )));
        }
        if self.find_inbound(inbound_id).is_none() {
            return Err(SettlementError::UnknownInbound(format!(
                "no inbound payment {} on deal {}",
                inbound_id, self.deal_id
            )));
        }

        let remaining = self.remaining_for(inbound_id, slot);
        if amount > remaining {
            return Err(SettlementError::OverPayment(format!(
                "payout of {} to {:?} exceeds remaining {} on inbound {}",
                amount, slot, remaining, inbound_id
            )));
        }

        let record = PaymentRecord {
            id: Uuid::new_v4(),
            direction: PaymentDirection::Outbound,
            amount,
            inbound: None,
            outbound: Some(OutboundMeta {
                belongs_to_inbound: inbound_id,
                slot,
            }),
            mode_of_payment,
            recorded_at: Utc::now(),
        };
        self.payments.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::SplitConfig;
    use rust_decimal_macros::dec;

    fn funded_deal() -> (ReferralDeal, Uuid) {
        let mut deal = ReferralDeal::new(
            "deal-1",
            Some("orb".into()),
            Some("orb-mentor".into()),
            Some("cosmo".into()),
        );
        deal.append_snapshot(dec!(100000), &SplitConfig::new(dec!(10), dec!(5), dec!(5)))
            .unwrap();
        let inbound = deal
            .record_inbound(dec!(50000), InboundMeta::default(), None)
            .unwrap();
        (deal, inbound.id)
    }

    #[test]
    fn test_inbound_must_be_positive() {
        let mut deal = ReferralDeal::new("d", None, None, None);
        let err = deal
            .record_inbound(dec!(0), InboundMeta::default(), None)
            .unwrap_err();
        assert!(matches!(err, SettlementError::InvalidAmount(_)));
    }

    #[test]
    fn test_outbound_requires_known_inbound() {
        let (mut deal, _) = funded_deal();
        let err = deal
            .record_outbound(Uuid::new_v4(), Slot::Orbiter, dec!(100), None)
            .unwrap_err();
        assert!(matches!(err, SettlementError::UnknownInbound(_)));
    }

    #[test]
    fn test_outbound_overpayment_guard() {
        // Orbiter share of 100000 at 10% is 10000.
        let (mut deal, inbound_id) = funded_deal();
        deal.record_outbound(inbound_id, Slot::Orbiter, dec!(4000), None)
            .unwrap();
        deal.record_outbound(inbound_id, Slot::Orbiter, dec!(4000), None)
            .unwrap();
        assert_eq!(deal.remaining_for(inbound_id, Slot::Orbiter), dec!(2000));

        let err = deal
            .record_outbound(inbound_id, Slot::Orbiter, dec!(3000), None)
            .unwrap_err();
        assert!(matches!(err, SettlementError::OverPayment(_)));
    }

    #[test]
    fn test_outbound_without_snapshot_is_overpayment() {
        let mut deal = ReferralDeal::new("d", Some("orb".into()), None, None);
        let inbound = deal
            .record_inbound(dec!(1000), InboundMeta::default(), None)
            .unwrap();

        let err = deal
            .record_outbound(inbound.id, Slot::Orbiter, dec!(1), None)
            .unwrap_err();
        assert!(matches!(err, SettlementError::OverPayment(_)));
    }

    #[test]
    fn test_gross_amount_preference_order() {
        let mut deal = ReferralDeal::new("d", None, None, None);

        // TDS withheld: gross = received + tds
        let with_tds = deal
            .record_inbound(
                dec!(47500),
                InboundMeta {
                    tds_amount: Some(dec!(2500)),
                    logical_amount: None,
                },
                None,
            )
            .unwrap();
        assert_eq!(with_tds.gross_amount(), dec!(50000));

        // Explicit logical amount wins over the tds arithmetic
        let with_logical = deal
            .record_inbound(
                dec!(47500),
                InboundMeta {
                    tds_amount: Some(dec!(2500)),
                    logical_amount: Some(dec!(51000)),
                },
                None,
            )
            .unwrap();
        assert_eq!(with_logical.gross_amount(), dec!(51000));

        // Bare inbound: received as-is
        let bare = deal
            .record_inbound(dec!(47500), InboundMeta::default(), None)
            .unwrap();
        assert_eq!(bare.gross_amount(), dec!(47500));
    }

    #[test]
    fn test_payments_are_append_only() {
        let (mut deal, inbound_id) = funded_deal();
        deal.record_outbound(inbound_id, Slot::Orbiter, dec!(1000), None)
            .unwrap();

        assert_eq!(deal.payments.len(), 2);
        assert_eq!(deal.payments[0].direction, PaymentDirection::Inbound);
        assert_eq!(deal.payments[1].direction, PaymentDirection::Outbound);
    }
}
