//! Attestation collaborator interfaces and error definitions.

use alloy::primitives::{Bytes, TxHash, B256};
use async_trait::async_trait;
use thiserror::Error;

use crate::attestation::request::AttestationRequest;

/// Shown when a failure carries no usable detail.
pub const GENERIC_FAILURE: &str = "Oops, something went wrong!";

/// Shown when the attestation call returned without a transaction hash.
pub const NO_TRANSACTION_HASH: &str = "Oops, something went wrong: no transaction hash was returned.";

/// Shown when the confirmed receipt does not expose an attestation id.
pub const NO_ATTESTATION_ID: &str =
    "Oops, something went wrong: the attestation ID could not be read from the transaction receipt.";

/// Errors raised by the attestation and confirmation collaborators.
#[derive(Debug, Error)]
pub enum AttestationError {
    /// The wallet or node refused the transaction.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The call timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was included but reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    /// Transaction never showed up in a block.
    #[error("transaction {tx_hash} not confirmed after {waited_secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, waited_secs: u64 },

    /// The request could not be turned into a transaction.
    #[error("invalid attestation request: {0}")]
    InvalidRequest(String),

    /// A failure whose shape is not known.
    #[error("unrecognized failure")]
    Unrecognized,
}

impl AttestationError {
    /// Text suitable for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            AttestationError::Unrecognized => GENERIC_FAILURE.to_string(),
            other => format!("Oops, something went wrong: {other}"),
        }
    }
}

pub type AttestationResult<T> = Result<T, AttestationError>;

/// What the registry hands back right after submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttestOutcome {
    pub transaction: Option<TxHash>,
}

/// Receipt data once a transaction is included. One topic list per log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmedReceipt {
    pub logs: Vec<Vec<B256>>,
}

impl ConfirmedReceipt {
    /// Second topic of the first log: the indexed attestation id.
    pub fn attestation_id(&self) -> Option<B256> {
        self.logs.first()?.get(1).copied()
    }
}

/// Attestation registry client - outbound port.
#[async_trait]
pub trait AttestationClient: Send + Sync {
    /// Submit an attestation through the registry portal.
    async fn attest(
        &self,
        request: &AttestationRequest,
        validation_payloads: &[Bytes],
    ) -> AttestationResult<AttestOutcome>;
}

/// Transaction confirmation client - outbound port.
#[async_trait]
pub trait ReceiptWaiter: Send + Sync {
    /// Wait until `tx_hash` is included and return its logs.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> AttestationResult<ConfirmedReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        assert_eq!(AttestationError::Unrecognized.user_message(), GENERIC_FAILURE);
        assert_eq!(
            AttestationError::Rejected("User denied transaction signature.".into()).user_message(),
            "Oops, something went wrong: request rejected: User denied transaction signature."
        );
    }

    #[test]
    fn test_attestation_id_position() {
        let first = vec![B256::repeat_byte(1), B256::repeat_byte(2)];
        let second = vec![B256::repeat_byte(3), B256::repeat_byte(4)];
        let receipt = ConfirmedReceipt {
            logs: vec![first, second],
        };
        assert_eq!(receipt.attestation_id(), Some(B256::repeat_byte(2)));

        assert_eq!(ConfirmedReceipt::default().attestation_id(), None);
        let short = ConfirmedReceipt {
            logs: vec![vec![B256::repeat_byte(1)]],
        };
        assert_eq!(short.attestation_id(), None);
    }
}
