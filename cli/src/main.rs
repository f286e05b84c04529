//! Command-line entry point for the ticket expiration gate.

mod config;
mod scan;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use tixgate_contract::{RpcTicketContract, TicketContract};
use tixgate_crypto::to_checksum;
use tixgate_notify::{Notifier, TerminalNotifier};
use tixgate_types::{Account, Address, TokenId};
use tixgate_utils::LogFormat;
use tixgate_workflow::{ExpirationOutcome, GateDecision, ScanEvent, ScannerSession};

use crate::config::GateConfig;

/// Printed against a progress notification whose submission was cut short.
const ABANDONED: &str =
    "interrupted before confirmation; the transaction may still be mined (check with `tixgate status`)";

#[derive(Parser)]
#[command(name = "tixgate", about = "Mark scanned tickets as expired on chain")]
struct Cli {
    /// Node JSON-RPC endpoint.
    #[arg(long, env = "TIXGATE_RPC_URL")]
    rpc_url: Option<String>,

    /// Address of the ticket contract.
    #[arg(long, env = "TIXGATE_CONTRACT")]
    contract: Option<Address>,

    /// Operator account (must be the contract owner, and signable by the node).
    #[arg(long, env = "TIXGATE_ACCOUNT")]
    account: Option<Address>,

    /// Seconds to wait for a receipt after submitting.
    #[arg(long, env = "TIXGATE_CONFIRMATION_TIMEOUT")]
    confirmation_timeout: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TIXGATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TIXGATE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "TIXGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show the contract owner and whether the configured account is it.
    Owner,
    /// Show whether a ticket is expired.
    Status {
        /// Ticket id (decimal).
        token: String,
    },
    /// Expire the ticket named by one QR payload.
    Expire {
        /// Decoded QR text.
        payload: String,
    },
    /// Read decoded QR payloads from stdin, one per line, and expire each.
    Scan,
}

impl Cli {
    /// File config (if any) overlaid with flags and env vars.
    fn resolve_config(&self) -> anyhow::Result<GateConfig> {
        let mut config = match &self.config {
            Some(path) => GateConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => GateConfig::default(),
        };
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url = rpc_url.clone();
        }
        if self.contract.is_some() {
            config.contract_address = self.contract;
        }
        if self.account.is_some() {
            config.account = self.account;
        }
        if let Some(secs) = self.confirmation_timeout {
            config.confirmation_timeout_secs = secs;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    tixgate_utils::init_tracing(&config.log_level, LogFormat::parse(&config.log_format));
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let settings = config.rpc_settings()?;
    let contract: Arc<dyn TicketContract> = Arc::new(RpcTicketContract::new(&settings)?);
    tracing::info!(
        rpc = %settings.rpc_url,
        contract = %to_checksum(&settings.contract_address),
        "using ticket contract"
    );

    match cli.command {
        Command::Owner => {
            let owner = contract.owner().await?;
            println!("owner:   {}", to_checksum(&owner));
            if let Some(account) = config.account {
                let status = if account == owner {
                    "authorized"
                } else {
                    "not authorized"
                };
                println!("account: {} ({status})", to_checksum(&account));
            }
        }
        Command::Status { token } => {
            let token_id = TokenId::from_scanned(&token)?;
            let expired = contract.ticket_expired(&token_id).await?;
            println!(
                "ticket {token_id}: {}",
                if expired { "expired" } else { "valid" }
            );
        }
        Command::Expire { payload } => {
            let notifier = Arc::new(TerminalNotifier::stdout());
            let mut session = open_session(contract, notifier, &config).await?;
            session.on_scan(ScanEvent::Decoded(payload));
            let outcome = session.mark_expired().await;
            return Ok(exit_code(&outcome));
        }
        Command::Scan => {
            let notifier = Arc::new(TerminalNotifier::stdout());
            let mut session = open_session(contract, notifier.clone(), &config).await?;
            println!("Scan the ticket QR code (one decoded payload per line, Ctrl-D to finish)");
            let input = BufReader::new(tokio::io::stdin());
            tokio::select! {
                summary = scan::run(&mut session, input) => {
                    let summary = summary.context("reading scans from stdin")?;
                    tracing::info!(
                        scanned = summary.scanned,
                        confirmed = summary.confirmed,
                        rejected = summary.rejected,
                        failed = summary.failed,
                        "scan session finished"
                    );
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("received SIGINT, stopping scan session");
                    abandon_in_flight(&*notifier);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Build a session and run the gate for the configured account.
async fn open_session(
    contract: Arc<dyn TicketContract>,
    notifier: Arc<dyn Notifier>,
    config: &GateConfig,
) -> anyhow::Result<ScannerSession> {
    let mut session = ScannerSession::new(contract, notifier);
    let account = config.account.map(Account::new);
    match session.on_account_changed(account).await {
        GateDecision::Authorized => Ok(session),
        GateDecision::NoAccount => {
            anyhow::bail!("no operator account configured (set account or --account)")
        }
        GateDecision::Denied { owner } => anyhow::bail!(
            "account is not the contract owner ({})",
            to_checksum(&owner)
        ),
        GateDecision::Unavailable(e) => {
            Err(e).context("could not check the contract owner")
        }
    }
}

/// Close progress left open by an interrupted submission and warn about it.
fn abandon_in_flight<W: Write + Send>(notifier: &TerminalNotifier<W>) -> usize {
    let abandoned = notifier.abandon_open(ABANDONED);
    if abandoned > 0 {
        tracing::warn!(abandoned, "scan session interrupted during a submission");
    }
    abandoned
}

fn exit_code(outcome: &ExpirationOutcome) -> ExitCode {
    if outcome.is_confirmed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
