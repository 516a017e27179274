//! Per-network client construction.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::attestation::{AttestationClient, ReceiptWaiter};
use crate::blockchain::{BlockchainError, BlockchainResult, ChainClient, PortalClient, Wallet};
use crate::config::{ConfirmationConfig, NetworkConfig};

/// The two outbound ports an attestation attempt needs.
#[derive(Clone)]
pub struct Clients {
    pub attestation: Arc<dyn AttestationClient>,
    pub receipts: Arc<dyn ReceiptWaiter>,
}

/// Builds clients for a network and account.
pub trait ClientFactory: Send + Sync {
    fn connect(&self, network: &NetworkConfig, account: Address) -> BlockchainResult<Clients>;
}

/// JSON-RPC backed factory signing with a local [`Wallet`].
#[derive(Debug, Clone)]
pub struct RpcClientFactory {
    wallet: Wallet,
    confirmation: ConfirmationConfig,
}

impl RpcClientFactory {
    pub fn new(wallet: Wallet, confirmation: ConfirmationConfig) -> Self {
        Self {
            wallet,
            confirmation,
        }
    }
}

impl ClientFactory for RpcClientFactory {
    fn connect(&self, network: &NetworkConfig, account: Address) -> BlockchainResult<Clients> {
        if account != self.wallet.address() {
            return Err(BlockchainError::Wallet(format!(
                "account {} is not controlled by the loaded key",
                account
            )));
        }

        let portal = PortalClient::new(
            network.clone(),
            &self.wallet,
            self.confirmation.rpc_timeout_secs,
        )?;
        let chain = ChainClient::new(network.clone(), self.confirmation.clone())?;

        Ok(Clients {
            attestation: Arc::new(portal),
            receipts: Arc::new(chain),
        })
    }
}
