//! Wallet and network context.
//!
//! A [`Session`] tracks the connected account and chain. Whenever either
//! changes the attestation client is rebuilt, or dropped when the account is
//! missing or the chain is not one of the two supported networks.

pub mod factory;

use alloy::primitives::Address;
use std::sync::Arc;

use crate::attestation::{AttestationSettings, Orchestrator};
use crate::config::{NetworkConfig, NetworksConfig};

pub use factory::{ClientFactory, Clients, RpcClientFactory};

/// Where the wallet currently points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState<'a> {
    /// No chain reported by the wallet.
    Disconnected,
    /// Connected to a chain the form cannot attest on.
    Unsupported(u64),
    Supported(&'a NetworkConfig),
}

/// Connected wallet plus the client built for it.
pub struct Session {
    networks: NetworksConfig,
    settings: AttestationSettings,
    factory: Arc<dyn ClientFactory>,
    account: Option<Address>,
    chain_id: Option<u64>,
    orchestrator: Option<Orchestrator>,
}

impl Session {
    /// A session with no wallet connected.
    pub fn new(
        networks: NetworksConfig,
        settings: AttestationSettings,
        factory: Arc<dyn ClientFactory>,
    ) -> Self {
        Self {
            networks,
            settings,
            factory,
            account: None,
            chain_id: None,
            orchestrator: None,
        }
    }

    /// Record a wallet change and rebuild the attestation client.
    pub fn update_wallet(&mut self, account: Option<Address>, chain_id: Option<u64>) {
        self.account = account;
        self.chain_id = chain_id;
        self.orchestrator = self.build_orchestrator();

        tracing::info!(
            account = ?self.account,
            chain_id = ?self.chain_id,
            client_ready = self.orchestrator.is_some(),
            "Wallet context updated"
        );
    }

    fn build_orchestrator(&self) -> Option<Orchestrator> {
        let account = self.account?;
        let NetworkState::Supported(network) = self.network_state() else {
            return None;
        };

        match self.factory.connect(network, account) {
            Ok(clients) => Some(Orchestrator::new(
                clients.attestation,
                clients.receipts,
                self.settings,
            )),
            Err(e) => {
                tracing::warn!(
                    chain_id = network.chain_id,
                    error = %e,
                    "Could not initialize attestation client"
                );
                None
            }
        }
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn network_state(&self) -> NetworkState<'_> {
        match self.chain_id {
            None => NetworkState::Disconnected,
            Some(id) => match self.networks.by_chain_id(id) {
                Some(network) => NetworkState::Supported(network),
                None => NetworkState::Unsupported(id),
            },
        }
    }

    /// The supported network the wallet is on, if any.
    pub fn network(&self) -> Option<&NetworkConfig> {
        match self.network_state() {
            NetworkState::Supported(network) => Some(network),
            _ => None,
        }
    }

    /// Wallet connected, but on a chain outside the supported pair.
    pub fn is_on_unsupported_network(&self) -> bool {
        self.account.is_some() && matches!(self.network_state(), NetworkState::Unsupported(_))
    }

    /// Client for the current account and network, when one could be built.
    pub fn orchestrator(&self) -> Option<&Orchestrator> {
        self.orchestrator.as_ref()
    }

    pub fn networks(&self) -> &NetworksConfig {
        &self.networks
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .field("client_ready", &self.orchestrator.is_some())
            .finish()
    }
}
