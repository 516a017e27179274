//! Text rendering of the form and its status banners.

use alloy::primitives::{TxHash, B256};
use std::fmt::Write;

use crate::config::NetworkConfig;
use crate::form::{Field, FormStore, SubmissionStatus};
use crate::session::Session;
use crate::view::links::{truncate_hex, ExplorerLinks};

/// One status message shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    /// Wallet connected on a chain outside the supported pair.
    UnsupportedNetwork(u64),
    /// Waiting for the wallet / registry to accept the attestation.
    Submitting,
    /// Transaction sent, waiting for inclusion.
    AwaitingConfirmation(TxHash),
    Success {
        transaction: TxHash,
        attestation_id: B256,
    },
    Error {
        message: String,
        transaction: Option<TxHash>,
    },
}

/// Banners for the current session and status, in display order.
pub fn banners(status: &SubmissionStatus, session: &Session) -> Vec<Banner> {
    let mut out = Vec::new();

    if session.is_on_unsupported_network() {
        if let Some(chain_id) = session.chain_id() {
            out.push(Banner::UnsupportedNetwork(chain_id));
        }
    }

    match status {
        SubmissionStatus::Idle => {}
        SubmissionStatus::Pending { transaction: None } => out.push(Banner::Submitting),
        SubmissionStatus::Pending {
            transaction: Some(tx),
        } => out.push(Banner::AwaitingConfirmation(*tx)),
        SubmissionStatus::Success {
            transaction,
            attestation_id,
        } => out.push(Banner::Success {
            transaction: *transaction,
            attestation_id: *attestation_id,
        }),
        SubmissionStatus::Error {
            message,
            transaction,
        } => out.push(Banner::Error {
            message: message.clone(),
            transaction: *transaction,
        }),
    }

    out
}

impl Banner {
    /// Render as text. Links need the network the status belongs to.
    pub fn render(&self, network: Option<&NetworkConfig>) -> String {
        let links = network.map(ExplorerLinks::new);
        let tx_line = |tx: &TxHash| match &links {
            Some(links) => format!(
                "Transaction Hash: {} ({})",
                truncate_hex(&tx.to_string()),
                links.transaction(*tx)
            ),
            None => format!("Transaction Hash: {}", tx),
        };

        match self {
            Banner::UnsupportedNetwork(chain_id) => format!(
                "Unsupported network (chain {}). Switch to Linea or Linea Sepolia.",
                chain_id
            ),
            Banner::Submitting => "Submitting attestation...".to_string(),
            Banner::AwaitingConfirmation(tx) => {
                format!("{}\nTransaction pending...", tx_line(tx))
            }
            Banner::Success {
                transaction,
                attestation_id,
            } => {
                let id_line = match &links {
                    Some(links) => format!(
                        "Attestation ID: {} ({})",
                        truncate_hex(&attestation_id.to_string()),
                        links.attestation(*attestation_id)
                    ),
                    None => format!("Attestation ID: {}", attestation_id),
                };
                format!("{}\n{}", tx_line(transaction), id_line)
            }
            Banner::Error {
                message,
                transaction,
            } => match transaction {
                Some(tx) => format!("{}\n{}", tx_line(tx), message),
                None => message.clone(),
            },
        }
    }
}

/// Render the three inputs, their inline errors and the submit control.
pub fn render_form(store: &FormStore, session: &Session) -> String {
    let mut out = render_fields(store);

    match store.submit_blocker(session) {
        Some(blocker) => {
            let _ = writeln!(out, "[Issue attestation] disabled: {}", blocker);
        }
        None => {
            let _ = writeln!(out, "[Issue attestation] ready");
        }
    }

    out
}

/// Render the three inputs with their inline errors.
pub fn render_fields(store: &FormStore) -> String {
    let mut out = String::new();

    for field in Field::ALL {
        let value = store.values().get(field);
        let shown = if value.is_empty() { "<empty>" } else { value };
        let _ = writeln!(out, "{:<24} {}", format!("{}:", field.label()), shown);

        let error = store.errors().get(field);
        if !error.is_empty() {
            let _ = writeln!(out, "{:<24} ! {}", "", error);
        }
    }

    out
}
