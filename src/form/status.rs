//! Submission status and its observable cell.

use alloy::primitives::{TxHash, B256};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle of one submission attempt.
///
/// The attestation id only exists on success and the error message only on
/// error; the enum makes any other combination unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    /// Submitting (`transaction == None`) or awaiting confirmation.
    Pending { transaction: Option<TxHash> },
    Success {
        transaction: TxHash,
        attestation_id: B256,
    },
    /// Terminal failure. The transaction is kept when one was sent.
    Error {
        message: String,
        transaction: Option<TxHash>,
    },
}

impl SubmissionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionStatus::Pending { .. })
    }

    pub fn transaction_reference(&self) -> Option<TxHash> {
        match self {
            SubmissionStatus::Idle => None,
            SubmissionStatus::Pending { transaction } => *transaction,
            SubmissionStatus::Success { transaction, .. } => Some(*transaction),
            SubmissionStatus::Error { transaction, .. } => *transaction,
        }
    }

    pub fn attestation_id(&self) -> Option<B256> {
        match self {
            SubmissionStatus::Success { attestation_id, .. } => Some(*attestation_id),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Shared handle to the current [`SubmissionStatus`].
///
/// Every transition is published on a watch channel so the rendering side
/// can redraw after each step.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    tx: Arc<watch::Sender<SubmissionStatus>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SubmissionStatus::Idle);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current status.
    pub fn current(&self) -> SubmissionStatus {
        self.tx.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.tx.borrow().is_pending()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.tx.subscribe()
    }

    /// Drop every artifact of a previous attempt.
    pub fn reset(&self) {
        self.publish(SubmissionStatus::Idle);
    }

    pub fn submitting(&self) {
        self.publish(SubmissionStatus::Pending { transaction: None });
    }

    pub fn awaiting_confirmation(&self, transaction: TxHash) {
        self.publish(SubmissionStatus::Pending {
            transaction: Some(transaction),
        });
    }

    pub fn succeed(&self, transaction: TxHash, attestation_id: B256) {
        self.publish(SubmissionStatus::Success {
            transaction,
            attestation_id,
        });
    }

    pub fn fail(&self, message: impl Into<String>, transaction: Option<TxHash>) {
        self.publish(SubmissionStatus::Error {
            message: message.into(),
            transaction,
        });
    }

    fn publish(&self, status: SubmissionStatus) {
        tracing::debug!(?status, "Submission status changed");
        self.tx.send_replace(status);
    }
}

impl Default for StatusHandle {
    fn default() -> Self {
        Self::new()
    }
}
