//! Verax portal client: encodes, signs and broadcasts `attest` calls.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::attestation::{
    AttestOutcome, AttestationClient, AttestationError, AttestationRequest, AttestationResult,
};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::NetworkConfig;

sol! {
    /// Registry-side attestation payload.
    #[derive(Debug)]
    struct AttestationPayload {
        bytes32 schemaId;
        uint64 expirationDate;
        bytes subject;
        bytes attestationData;
    }

    /// Portal entry point.
    #[derive(Debug)]
    function attest(AttestationPayload attestationPayload, bytes[] validationPayloads) external payable;

    /// Emitted by the registry; the attestation id is the first indexed topic.
    #[derive(Debug)]
    event AttestationRegistered(bytes32 indexed attestationId);

    /// Schema `(string commitHash, string repoUrl)`.
    #[derive(Debug)]
    struct AuditData {
        string commitHash;
        string repoUrl;
    }
}

/// Build the calldata for `attest(payload, validationPayloads)`.
pub fn encode_attest_call(
    request: &AttestationRequest,
    validation_payloads: &[Bytes],
) -> AttestationResult<Bytes> {
    let record = request.attestation_data.first().ok_or_else(|| {
        AttestationError::InvalidRequest("attestation data is empty".to_string())
    })?;

    let data = AuditData {
        commitHash: record.commit_hash.clone(),
        repoUrl: record.repo_url.clone(),
    };

    let call = attestCall {
        attestationPayload: AttestationPayload {
            schemaId: request.schema_id,
            expirationDate: request.expiration_date,
            subject: Bytes::from(request.subject.abi_encode()),
            attestationData: Bytes::from(data.abi_encode()),
        },
        validationPayloads: validation_payloads.to_vec(),
    };

    Ok(Bytes::from(call.abi_encode()))
}

/// Signing client bound to one network and one account.
#[derive(Clone)]
pub struct PortalClient {
    provider: Arc<dyn Provider + Send + Sync>,
    network: NetworkConfig,
    timeout_duration: Duration,
}

impl PortalClient {
    pub fn new(
        network: NetworkConfig,
        wallet: &Wallet,
        rpc_timeout_secs: u64,
    ) -> BlockchainResult<Self> {
        let url: url::Url = network.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", network.rpc_url, e))
        })?;

        let provider = Arc::new(
            ProviderBuilder::new()
                .wallet(wallet.to_ethereum_wallet())
                .connect_http(url),
        ) as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            network,
            timeout_duration: Duration::from_secs(rpc_timeout_secs),
        })
    }
}

#[async_trait]
impl AttestationClient for PortalClient {
    async fn attest(
        &self,
        request: &AttestationRequest,
        validation_payloads: &[Bytes],
    ) -> AttestationResult<AttestOutcome> {
        let input = encode_attest_call(request, validation_payloads)?;

        let tx = TransactionRequest::default()
            .with_to(request.portal_id)
            .with_value(U256::ZERO)
            .with_input(input)
            .with_chain_id(self.network.chain_id);

        let pending = match timeout(self.timeout_duration, self.provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(classify_rpc_error(e)),
            Err(_) => return Err(AttestationError::Timeout(self.timeout_duration.as_secs())),
        };

        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %tx_hash, chain_id = self.network.chain_id, "Attestation broadcast");

        Ok(AttestOutcome {
            transaction: Some(tx_hash),
        })
    }
}

/// Node error responses (reverts, nonce or balance problems) keep their
/// message; everything else is a transport failure.
fn classify_rpc_error(err: RpcError<TransportErrorKind>) -> AttestationError {
    match err.as_error_resp() {
        Some(payload) if !payload.message.is_empty() => {
            AttestationError::Rejected(payload.message.to_string())
        }
        Some(_) => AttestationError::Unrecognized,
        None => AttestationError::Rpc(err.to_string()),
    }
}

impl std::fmt::Debug for PortalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalClient")
            .field("rpc_url", &self.network.rpc_url)
            .field("chain_id", &self.network.chain_id)
            .finish()
    }
}
