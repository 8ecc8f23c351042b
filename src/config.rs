//! Configuration
//!
//! CLI arguments and environment variable handling using clap. The split
//! percentages default to the organization's standard distribution and can
//! be overridden per deployment.

use clap::Parser;
use rust_decimal::Decimal;

use crate::ledger::SplitConfig;

/// Referral settlement ledger for the admin dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "referral-settlement")]
#[command(about = "Referral settlement ledger: deal splits, payments, reconciliation")]
pub struct Args {
    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "referral_admin")]
    pub mongodb_db: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Orbiter share of the deal value, in percent
    #[arg(long, env = "SPLIT_ORBITER_PERCENT", default_value = "10")]
    pub orbiter_percent: Decimal,

    /// Orbiter mentor share of the deal value, in percent
    #[arg(long, env = "SPLIT_ORBITER_MENTOR_PERCENT", default_value = "5")]
    pub orbiter_mentor_percent: Decimal,

    /// Cosmo mentor share of the deal value, in percent
    #[arg(long, env = "SPLIT_COSMO_MENTOR_PERCENT", default_value = "5")]
    pub cosmo_mentor_percent: Decimal,
}

impl Args {
    /// The configured stakeholder split.
    pub fn split_config(&self) -> SplitConfig {
        SplitConfig::new(
            self.orbiter_percent,
            self.orbiter_mentor_percent,
            self.cosmo_mentor_percent,
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.split_config().validate().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let args = Args::parse_from(["referral-settlement"]);
        assert!(args.validate().is_ok());
        assert_eq!(args.split_config().orbiter_percent, Decimal::from(10));
    }

    #[test]
    fn test_oversubscribed_split_rejected() {
        let args = Args::parse_from([
            "referral-settlement",
            "--orbiter-percent",
            "60",
            "--orbiter-mentor-percent",
            "30",
            "--cosmo-mentor-percent",
            "20",
        ]);
        assert!(args.validate().is_err());
    }
}
