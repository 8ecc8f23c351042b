//! Operator CLI for the referral settlement ledger.
//!
//! Thin stand-in for the admin dashboard: each subcommand maps to one
//! settlement operation and prints the result as JSON. Write commands are
//! retried once on `ConcurrentModification`; every other error needs an
//! operator decision and is surfaced as-is.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, warn};
use uuid::Uuid;

use referral_settlement::db::MongoClient;
use referral_settlement::ledger::{DealStatus, Slot};
use referral_settlement::store::MongoDealStore;
use referral_settlement::{logging, Args, NewPayment, SettlementError, SettlementService};

#[derive(Parser, Debug)]
#[command(name = "referral-settlement")]
struct Cli {
    #[command(flatten)]
    args: Args,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new referral deal
    Create {
        deal_id: String,
        #[arg(long)]
        orbiter: Option<String>,
        #[arg(long)]
        orbiter_mentor: Option<String>,
        #[arg(long)]
        cosmo_mentor: Option<String>,
    },
    /// List all referral deals
    List,
    /// Show the raw deal record
    Show { deal_id: String },
    /// Preview the share split for a deal value (no write)
    Propose { deal_id: String, deal_value: Decimal },
    /// Commit a distribution snapshot for a deal value
    Commit { deal_id: String, deal_value: Decimal },
    /// Record an inbound payment from the deal counterparty
    PayIn {
        deal_id: String,
        amount: Decimal,
        /// Withheld TDS, when the received amount is net of deduction
        #[arg(long)]
        tds: Option<Decimal>,
        /// Gross amount before deduction
        #[arg(long)]
        gross: Option<Decimal>,
        #[arg(long)]
        mode: Option<String>,
    },
    /// Record a payout to a stakeholder slot, drawn against one inbound
    PayOut {
        deal_id: String,
        inbound_id: Uuid,
        #[arg(value_enum)]
        slot: Slot,
        amount: Decimal,
        #[arg(long)]
        mode: Option<String>,
    },
    /// Set the deal lifecycle status
    SetStatus {
        deal_id: String,
        #[arg(value_enum)]
        status: DealStatus,
    },
    /// Print the paid/remaining reconciliation report
    Reconcile { deal_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(&cli.args.log_level);

    if let Err(e) = cli.args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let mongo = MongoClient::new(&cli.args.mongodb_uri, &cli.args.mongodb_db).await?;
    let store = Arc::new(MongoDealStore::new(&mongo).await?);
    let service = SettlementService::new(store, cli.args.split_config());

    let mut result = run(&service, &cli.command).await;
    if matches!(result, Err(SettlementError::ConcurrentModification(_))) {
        warn!("write raced with another operator, retrying once");
        result = run(&service, &cli.command).await;
    }

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

async fn run(
    service: &SettlementService<MongoDealStore>,
    command: &Command,
) -> Result<serde_json::Value, SettlementError> {
    let value = match command {
        Command::Create {
            deal_id,
            orbiter,
            orbiter_mentor,
            cosmo_mentor,
        } => serde_json::to_value(
            service
                .create_deal(
                    deal_id,
                    orbiter.clone(),
                    orbiter_mentor.clone(),
                    cosmo_mentor.clone(),
                )
                .await?,
        )?,
        Command::List => serde_json::to_value(service.list_deals().await?)?,
        Command::Show { deal_id } => serde_json::to_value(service.get_deal(deal_id).await?)?,
        Command::Propose {
            deal_id,
            deal_value,
        } => serde_json::to_value(service.propose_distribution(deal_id, *deal_value).await?)?,
        Command::Commit {
            deal_id,
            deal_value,
        } => serde_json::to_value(service.commit_distribution(deal_id, *deal_value).await?)?,
        Command::PayIn {
            deal_id,
            amount,
            tds,
            gross,
            mode,
        } => serde_json::to_value(
            service
                .record_payment(
                    deal_id,
                    NewPayment::Inbound {
                        amount: *amount,
                        tds_amount: *tds,
                        logical_amount: *gross,
                        mode_of_payment: mode.clone(),
                    },
                )
                .await?,
        )?,
        Command::PayOut {
            deal_id,
            inbound_id,
            slot,
            amount,
            mode,
        } => serde_json::to_value(
            service
                .record_payment(
                    deal_id,
                    NewPayment::Outbound {
                        inbound_id: *inbound_id,
                        slot: *slot,
                        amount: *amount,
                        mode_of_payment: mode.clone(),
                    },
                )
                .await?,
        )?,
        Command::SetStatus { deal_id, status } => {
            serde_json::to_value(service.set_status(deal_id, *status).await?)?
        }
        Command::Reconcile { deal_id } => {
            serde_json::to_value(service.get_reconciliation(deal_id).await?)?
        }
    };
    Ok(value)
}
