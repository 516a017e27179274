//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint of one supported network
//! - Verify the endpoint serves the expected chain
//! - Poll for transaction receipts until inclusion or timeout

use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::attestation::{AttestationError, AttestationResult, ConfirmedReceipt, ReceiptWaiter};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::config::{ConfirmationConfig, NetworkConfig};

/// Read-only RPC client for one network.
#[derive(Clone)]
pub struct ChainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    network: NetworkConfig,
    confirmation: ConfirmationConfig,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new client.
    ///
    /// No request is made; use [`ChainClient::verify_chain_id`] to check the
    /// endpoint.
    pub fn new(network: NetworkConfig, confirmation: ConfirmationConfig) -> BlockchainResult<Self> {
        let url: url::Url = network.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", network.rpc_url, e))
        })?;
        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        Ok(Self::with_provider(provider, network, confirmation))
    }

    /// Create a client over an already connected provider.
    pub fn with_provider(
        provider: Arc<dyn Provider + Send + Sync>,
        network: NetworkConfig,
        confirmation: ConfirmationConfig,
    ) -> Self {
        tracing::debug!(
            rpc_url = %network.rpc_url,
            chain_id = network.chain_id,
            "Chain client created"
        );

        Self {
            provider,
            timeout_duration: Duration::from_secs(confirmation.rpc_timeout_secs),
            network,
            confirmation,
        }
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<ChainId> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.network.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.network.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(chain_id)
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        match timeout(self.timeout_duration, self.provider.get_chain_id()).await {
            Ok(Ok(result)) => Ok(ChainId(result)),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        match timeout(self.timeout_duration, self.provider.get_transaction_receipt(tx_hash)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    /// Poll until `tx_hash` is included in a block.
    ///
    /// A reverted transaction is an error. Transient RPC failures while
    /// polling are logged and polling continues until the overall deadline.
    pub async fn wait_for_inclusion(&self, tx_hash: TxHash) -> AttestationResult<TransactionReceipt> {
        let waited_secs = self.confirmation.timeout_secs;
        let poll_interval = Duration::from_millis(self.confirmation.poll_interval_ms);

        let result = timeout(Duration::from_secs(waited_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                match self.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                    Err(e) => tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed"),
                }
            }
        })
        .await;

        let receipt = result.map_err(|_| AttestationError::ConfirmationTimeout {
            tx_hash,
            waited_secs,
        })?;

        if !receipt.status() {
            return Err(AttestationError::Reverted(tx_hash));
        }
        Ok(receipt)
    }
}

#[async_trait]
impl ReceiptWaiter for ChainClient {
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> AttestationResult<ConfirmedReceipt> {
        let receipt = self.wait_for_inclusion(tx_hash).await?;

        tracing::info!(
            tx_hash = %tx_hash,
            block = receipt.block_number.unwrap_or_default(),
            "Transaction included"
        );

        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.topics().to_vec())
            .collect();
        Ok(ConfirmedReceipt { logs })
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.network.rpc_url)
            .field("chain_id", &self.network.chain_id)
            .field("timeout_secs", &self.confirmation.rpc_timeout_secs)
            .finish()
    }
}
