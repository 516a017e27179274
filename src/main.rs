//! Proof of Audit CLI
//!
//! Issue an on-chain attestation that a contract was audited at a specific
//! commit of a GitHub repository.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI args ──▶ form::FormStore ──field_changed──▶ form::validator
//!                     │
//!                 begin_submit ◀── session::Session (account, chain, client)
//!                     │
//!                     ▼
//!          attestation::Orchestrator
//!            │                  │
//!            ▼                  ▼
//!   blockchain::PortalClient  blockchain::ChainClient
//!     (sign + broadcast)        (receipt polling)
//!            │                  │
//!            └──── StatusHandle ┘──▶ view (banners, explorer links)
//! ```
//!
//! Logs go to stderr; the rendered form and banners go to stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use proof_of_audit::blockchain::{BlockchainError, ChainClient, Wallet};
use proof_of_audit::config::{load_or_default, AppConfig, NetworkKind};
use proof_of_audit::form::{Field, FormStore, SubmissionStatus, SubmitRejected};
use proof_of_audit::observability::init_logging;
use proof_of_audit::session::{RpcClientFactory, Session};
use proof_of_audit::view::{banners, follow, render_fields, render_form};

#[derive(Parser)]
#[command(name = "proof-of-audit")]
#[command(about = "Issue Verax attestations for smart contract audits", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "PROOF_OF_AUDIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct FormArgs {
    /// GitHub repository URL (https://github.com/<owner>/<repo>)
    #[arg(long, default_value = "")]
    repo_url: String,

    /// Full 40-character lowercase commit hash
    #[arg(long, default_value = "")]
    commit_hash: String,

    /// Address of the audited contract
    #[arg(long, default_value = "")]
    contract_address: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the form fields without submitting
    Validate {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Sign and submit an attestation, then wait for confirmation
    Attest {
        /// Network to attest on
        #[arg(short, long, value_enum, default_value = "testnet")]
        network: NetworkKind,

        /// Print the final status as JSON instead of banners
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        form: FormArgs,
    },
    /// List the supported networks and their explorers
    Networks,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    match cli.command {
        Commands::Validate { form } => {
            let store = fill_form(&form);
            print!("{}", render_fields(&store));
            if store.errors().is_clean() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Attest {
            network,
            json,
            form,
        } => attest(config, network, json, form).await,
        Commands::Networks => {
            for network in config.networks.iter() {
                println!("{} (chain {})", network.name, network.chain_id);
                println!("  rpc:          {}", network.rpc_url);
                println!("  transactions: {}<tx hash>", network.tx_explorer_url);
                println!("  attestations: {}<attestation id>", network.attestation_explorer_url);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Type every provided value into a fresh form, revalidating field by field.
fn fill_form(args: &FormArgs) -> FormStore {
    let mut store = FormStore::new();
    store.field_changed(Field::RepoUrl, args.repo_url.as_str());
    store.field_changed(Field::CommitHash, args.commit_hash.as_str());
    store.field_changed(Field::ContractAddress, args.contract_address.as_str());
    store
}

async fn attest(
    config: AppConfig,
    kind: NetworkKind,
    json: bool,
    form: FormArgs,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut store = fill_form(&form);
    if !store.errors().is_clean() {
        if json {
            println!("{}", serde_json::to_string_pretty(store.errors())?);
        } else {
            print!("{}", render_fields(&store));
        }
        return Ok(ExitCode::FAILURE);
    }

    let settings = config
        .attestation
        .settings()
        .map_err(|errors| format!("invalid attestation settings: {:?}", errors))?;
    let wallet = Wallet::from_env()?;
    let account = wallet.address();

    // The chain the endpoint actually serves plays the role of the wallet's
    // network; a mismatch shows up as an unsupported network.
    let target = config.networks.get(kind).clone();
    let chain_id = match ChainClient::new(target.clone(), config.confirmation.clone())?
        .verify_chain_id()
        .await
    {
        Ok(chain_id) => chain_id.0,
        Err(BlockchainError::ChainMismatch { expected, actual }) => {
            tracing::warn!(
                expected,
                actual,
                rpc_url = %target.rpc_url,
                "RPC endpoint serves a different chain"
            );
            actual
        }
        Err(e) => return Err(e.into()),
    };

    let factory = Arc::new(RpcClientFactory::new(wallet, config.confirmation.clone()));
    let mut session = Session::new(config.networks.clone(), settings, factory);
    session.update_wallet(Some(account), Some(chain_id));

    if !json {
        println!("Account: {}", account);
        print!("{}", render_form(&store, &session));
    }

    let submission = match store.begin_submit(&session) {
        Ok(submission) => submission,
        Err(SubmitRejected::Invalid(_)) => return Ok(ExitCode::FAILURE),
        Err(SubmitRejected::Blocked(blocker)) => {
            for banner in banners(&store.status(), &session) {
                println!("{}", banner.render(session.network()));
            }
            eprintln!("Cannot submit: {}", blocker);
            return Ok(ExitCode::FAILURE);
        }
    };

    let final_status = if json {
        let status = follow(submission, &session, &mut std::io::sink()).await?;
        println!("{}", serde_json::to_string_pretty(&status)?);
        status
    } else {
        follow(submission, &session, &mut std::io::stdout()).await?
    };

    match final_status {
        SubmissionStatus::Success { .. } => Ok(ExitCode::SUCCESS),
        _ => Ok(ExitCode::FAILURE),
    }
}
