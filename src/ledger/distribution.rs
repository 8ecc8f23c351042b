//! Distribution calculator
//!
//! Pure derivation of per-slot share amounts from a negotiated deal value
//! and the organization's split percentages. The three explicit stakeholder
//! shares are rounded independently; the organization's share is the exact
//! remainder, so the four amounts always total the deal value.

use clap::ValueEnum;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{Result, SettlementError};

/// One of the four stakeholder roles eligible for a share of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Slot {
    Orbiter,
    OrbiterMentor,
    CosmoMentor,
    Organization,
}

impl Slot {
    /// The closed slot set, in reporting order.
    pub const ALL: [Slot; 4] = [
        Slot::Orbiter,
        Slot::OrbiterMentor,
        Slot::CosmoMentor,
        Slot::Organization,
    ];
}

/// Which optional stakeholder roles are attached to a referral.
///
/// The organization is always present. An absent role's configured
/// percentage flows back to the organization, never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPresence {
    pub orbiter: bool,
    pub orbiter_mentor: bool,
    pub cosmo_mentor: bool,
}

impl Default for SlotPresence {
    fn default() -> Self {
        Self {
            orbiter: true,
            orbiter_mentor: true,
            cosmo_mentor: true,
        }
    }
}

/// Percentage configuration for the three explicit stakeholder slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(with = "rust_decimal::serde::str")]
    pub orbiter_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub orbiter_mentor_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub cosmo_mentor_percent: Decimal,
}

impl SplitConfig {
    pub fn new(
        orbiter_percent: Decimal,
        orbiter_mentor_percent: Decimal,
        cosmo_mentor_percent: Decimal,
    ) -> Self {
        Self {
            orbiter_percent,
            orbiter_mentor_percent,
            cosmo_mentor_percent,
        }
    }

    /// Reject percentages outside 0-100 or summing past 100.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("orbiter", self.orbiter_percent),
            ("orbiter mentor", self.orbiter_mentor_percent),
            ("cosmo mentor", self.cosmo_mentor_percent),
        ];
        for (name, pct) in named {
            if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                return Err(SettlementError::InvalidConfiguration(format!(
                    "{} percentage {} is outside 0-100",
                    name, pct
                )));
            }
        }

        let total = self.orbiter_percent + self.orbiter_mentor_percent + self.cosmo_mentor_percent;
        if total > Decimal::ONE_HUNDRED {
            return Err(SettlementError::InvalidConfiguration(format!(
                "stakeholder percentages sum to {}, which exceeds 100",
                total
            )));
        }

        Ok(())
    }
}

/// Computed share amounts, one per slot.
///
/// The slot set is closed (never more than four roles), so this is a fixed
/// struct rather than a map; it keeps BSON round-trips exact and makes the
/// total a straight sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSet {
    #[serde(with = "rust_decimal::serde::str")]
    pub orbiter: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub orbiter_mentor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub cosmo_mentor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub organization: Decimal,
}

impl ShareSet {
    pub fn zero() -> Self {
        Self {
            orbiter: Decimal::ZERO,
            orbiter_mentor: Decimal::ZERO,
            cosmo_mentor: Decimal::ZERO,
            organization: Decimal::ZERO,
        }
    }

    /// Share amount for one slot.
    pub fn get(&self, slot: Slot) -> Decimal {
        match slot {
            Slot::Orbiter => self.orbiter,
            Slot::OrbiterMentor => self.orbiter_mentor,
            Slot::CosmoMentor => self.cosmo_mentor,
            Slot::Organization => self.organization,
        }
    }

    /// Sum over all four slots; always equals the deal value for shares
    /// produced by [`compute_shares`].
    pub fn total(&self) -> Decimal {
        self.orbiter + self.orbiter_mentor + self.cosmo_mentor + self.organization
    }
}

/// Derive per-slot share amounts for a deal value.
///
/// Each present stakeholder share is `deal_value * percent / 100`, rounded
/// half-up to the minor currency unit. The organization takes the exact
/// remainder, absorbing both the rounding residue and the percentages of
/// absent roles.
pub fn compute_shares(
    deal_value: Decimal,
    config: &SplitConfig,
    presence: &SlotPresence,
) -> Result<ShareSet> {
    if deal_value <= Decimal::ZERO {
        return Err(SettlementError::InvalidAmount(format!(
            "deal value must be positive, got {}",
            deal_value
        )));
    }
    config.validate()?;

    let cut = |present: bool, percent: Decimal| {
        if present {
            (deal_value * percent / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        }
    };

    let orbiter = cut(presence.orbiter, config.orbiter_percent);
    let orbiter_mentor = cut(presence.orbiter_mentor, config.orbiter_mentor_percent);
    let cosmo_mentor = cut(presence.cosmo_mentor, config.cosmo_mentor_percent);
    let organization = deal_value - orbiter - orbiter_mentor - cosmo_mentor;

    Ok(ShareSet {
        orbiter,
        orbiter_mentor,
        cosmo_mentor,
        organization,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ten_five_five() -> SplitConfig {
        SplitConfig::new(dec!(10), dec!(5), dec!(5))
    }

    #[test]
    fn test_standard_split() {
        let shares =
            compute_shares(dec!(100000), &ten_five_five(), &SlotPresence::default()).unwrap();

        assert_eq!(shares.orbiter, dec!(10000));
        assert_eq!(shares.orbiter_mentor, dec!(5000));
        assert_eq!(shares.cosmo_mentor, dec!(5000));
        assert_eq!(shares.organization, dec!(80000));
        assert_eq!(shares.total(), dec!(100000));
    }

    #[test]
    fn test_total_always_equals_deal_value() {
        let config = SplitConfig::new(dec!(33.33), dec!(33.33), dec!(33.33));
        for value in [dec!(100.01), dec!(999.99), dec!(0.01), dec!(123456.78)] {
            let shares = compute_shares(value, &config, &SlotPresence::default()).unwrap();
            assert_eq!(shares.total(), value, "residue leaked for {}", value);
        }
    }

    #[test]
    fn test_rounding_half_up() {
        // 50% of 10.01 is 5.005, which rounds up to 5.01
        let config = SplitConfig::new(dec!(50), dec!(0), dec!(0));
        let shares = compute_shares(dec!(10.01), &config, &SlotPresence::default()).unwrap();

        assert_eq!(shares.orbiter, dec!(5.01));
        assert_eq!(shares.organization, dec!(5.00));
        assert_eq!(shares.total(), dec!(10.01));
    }

    #[test]
    fn test_absent_role_redirects_to_organization() {
        let presence = SlotPresence {
            cosmo_mentor: false,
            ..Default::default()
        };
        let shares = compute_shares(dec!(100000), &ten_five_five(), &presence).unwrap();

        assert_eq!(shares.cosmo_mentor, dec!(0));
        assert_eq!(shares.organization, dec!(85000));
        assert_eq!(shares.total(), dec!(100000));
    }

    #[test]
    fn test_rejects_non_positive_deal_value() {
        for value in [dec!(0), dec!(-1)] {
            let err = compute_shares(value, &ten_five_five(), &SlotPresence::default())
                .unwrap_err();
            assert!(matches!(err, SettlementError::InvalidAmount(_)));
        }
    }

    #[test]
    fn test_rejects_percentages_over_hundred() {
        let config = SplitConfig::new(dec!(60), dec!(30), dec!(20));
        let err =
            compute_shares(dec!(1000), &config, &SlotPresence::default()).unwrap_err();
        assert!(matches!(err, SettlementError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_negative_percentage() {
        let config = SplitConfig::new(dec!(-10), dec!(5), dec!(5));
        let err =
            compute_shares(dec!(1000), &config, &SlotPresence::default()).unwrap_err();
        assert!(matches!(err, SettlementError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_full_hundred_percent_leaves_organization_residue_only() {
        let config = SplitConfig::new(dec!(50), dec!(25), dec!(25));
        let shares = compute_shares(dec!(100.01), &config, &SlotPresence::default()).unwrap();

        assert_eq!(shares.orbiter, dec!(50.01));
        assert_eq!(shares.organization, dec!(0.00));
        assert_eq!(shares.total(), dec!(100.01));
    }
}
