//! Two-phase attestation flow: submit, then wait for confirmation.
//!
//! # Data Flow
//! ```text
//! FormValues
//!     → AttestationRequest (settings + expiration)
//!     → AttestationClient::attest        Pending { None }
//!     → tx hash                          Pending { Some(tx) }
//!     → ReceiptWaiter::wait_for_receipt
//!     → logs[0].topics[1]                Success { tx, id }
//! ```
//!
//! Any failure ends the attempt in `Error`. Nothing is retried.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::attestation::request::{unix_now, AttestationRequest, AttestationSettings};
use crate::attestation::types::{
    AttestationClient, ReceiptWaiter, NO_ATTESTATION_ID, NO_TRANSACTION_HASH,
};
use crate::blockchain::ChainId;
use crate::form::{FormValues, StatusHandle};

/// Drives one attestation attempt and reports through a [`StatusHandle`].
#[derive(Clone)]
pub struct Orchestrator {
    client: Arc<dyn AttestationClient>,
    receipts: Arc<dyn ReceiptWaiter>,
    settings: AttestationSettings,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn AttestationClient>,
        receipts: Arc<dyn ReceiptWaiter>,
        settings: AttestationSettings,
    ) -> Self {
        Self {
            client,
            receipts,
            settings,
        }
    }

    /// Issue an attestation for `values`.
    ///
    /// Outcomes are only visible through `status`; this never returns an error.
    #[tracing::instrument(skip_all, fields(account = %account, chain_id = network.0))]
    pub async fn issue_attestation(
        &self,
        values: FormValues,
        account: Address,
        network: ChainId,
        status: &StatusHandle,
    ) {
        status.submitting();

        let request = match AttestationRequest::build(&values, &self.settings, unix_now()) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Could not build attestation request");
                status.fail(e.user_message(), None);
                return;
            }
        };

        tracing::info!(
            subject = %request.subject,
            portal = %request.portal_id,
            expiration = request.expiration_date,
            "Submitting attestation"
        );

        let outcome = match self.client.attest(&request, &[]).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Attestation submission failed");
                status.fail(e.user_message(), None);
                return;
            }
        };

        let Some(tx_hash) = outcome.transaction else {
            tracing::warn!("Attestation call returned no transaction hash");
            status.fail(NO_TRANSACTION_HASH, None);
            return;
        };

        tracing::info!(tx_hash = %tx_hash, "Attestation sent, awaiting confirmation");
        status.awaiting_confirmation(tx_hash);

        let receipt = match self.receipts.wait_for_receipt(tx_hash).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(tx_hash = %tx_hash, error = %e, "Confirmation failed");
                status.fail(e.user_message(), Some(tx_hash));
                return;
            }
        };

        match receipt.attestation_id() {
            Some(attestation_id) => {
                tracing::info!(
                    tx_hash = %tx_hash,
                    attestation_id = %attestation_id,
                    "Attestation confirmed"
                );
                status.succeed(tx_hash, attestation_id);
            }
            None => {
                tracing::warn!(
                    tx_hash = %tx_hash,
                    logs = receipt.logs.len(),
                    "Receipt carries no attestation id"
                );
                status.fail(NO_ATTESTATION_ID, Some(tx_hash));
            }
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::types::{
        AttestOutcome, AttestationError, AttestationResult, ConfirmedReceipt,
    };
    use crate::form::SubmissionStatus;
    use alloy::primitives::{Bytes, TxHash, B256};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedClient(Mutex<Option<AttestationResult<AttestOutcome>>>);

    #[async_trait]
    impl AttestationClient for FixedClient {
        async fn attest(
            &self,
            _request: &AttestationRequest,
            _validation_payloads: &[Bytes],
        ) -> AttestationResult<AttestOutcome> {
            self.0.lock().unwrap().take().unwrap_or(Err(AttestationError::Unrecognized))
        }
    }

    struct FixedReceipt(Mutex<Option<AttestationResult<ConfirmedReceipt>>>);

    #[async_trait]
    impl ReceiptWaiter for FixedReceipt {
        async fn wait_for_receipt(&self, _tx_hash: TxHash) -> AttestationResult<ConfirmedReceipt> {
            self.0.lock().unwrap().take().unwrap_or(Err(AttestationError::Unrecognized))
        }
    }

    fn orchestrator(
        attest: AttestationResult<AttestOutcome>,
        receipt: AttestationResult<ConfirmedReceipt>,
    ) -> Orchestrator {
        Orchestrator::new(
            Arc::new(FixedClient(Mutex::new(Some(attest)))),
            Arc::new(FixedReceipt(Mutex::new(Some(receipt)))),
            AttestationSettings {
                portal_id: Address::repeat_byte(0xbb),
                schema_id: B256::repeat_byte(0x59),
                validity_secs: 60,
            },
        )
    }

    fn values() -> FormValues {
        FormValues::new(
            "https://github.com/foo/bar",
            "37f8ecd53a64ba2395b7de0a8d7ecb0dbfdced64",
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        )
    }

    async fn run(orchestrator: Orchestrator) -> SubmissionStatus {
        let status = StatusHandle::new();
        orchestrator
            .issue_attestation(values(), Address::ZERO, ChainId(59141), &status)
            .await;
        status.current()
    }

    #[tokio::test]
    async fn test_missing_transaction_hash() {
        let status = run(orchestrator(
            Ok(AttestOutcome { transaction: None }),
            Ok(ConfirmedReceipt::default()),
        ))
        .await;

        assert_eq!(
            status,
            SubmissionStatus::Error {
                message: NO_TRANSACTION_HASH.to_string(),
                transaction: None,
            }
        );
    }

    #[tokio::test]
    async fn test_confirmation_failure_keeps_transaction() {
        let tx = TxHash::repeat_byte(0xab);
        let status = run(orchestrator(
            Ok(AttestOutcome {
                transaction: Some(tx),
            }),
            Err(AttestationError::ConfirmationTimeout {
                tx_hash: tx,
                waited_secs: 120,
            }),
        ))
        .await;

        assert_eq!(status.transaction_reference(), Some(tx));
        assert!(status.error_message().unwrap().contains("not confirmed"));
        assert_eq!(status.attestation_id(), None);
    }

    #[tokio::test]
    async fn test_unrecognized_failure_uses_generic_message() {
        let status = run(orchestrator(
            Err(AttestationError::Unrecognized),
            Ok(ConfirmedReceipt::default()),
        ))
        .await;

        assert_eq!(status.error_message(), Some(crate::attestation::GENERIC_FAILURE));
    }
}
