//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Registry portal, schema and validity window.
    pub attestation: AttestationConfig,

    /// The two supported chains.
    pub networks: NetworksConfig,

    /// Receipt polling settings.
    pub confirmation: ConfirmationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Attestation registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AttestationConfig {
    /// Portal contract address.
    pub portal_id: String,

    /// Schema identifier (bytes32).
    pub schema_id: String,

    /// Seconds from issuance until the attestation expires.
    pub validity_secs: u64,
}

impl Default for AttestationConfig {
    fn default() -> Self {
        Self {
            portal_id: "0xbb92965c718852a8dc1b6e930239de4e08d93e60".to_string(),
            schema_id: "0x59ffe1d5bdbd99d418fc1dba03b136176ca52da322cab38fed6f29c2ca29bd71"
                .to_string(),
            validity_secs: 30 * 24 * 60 * 60,
        }
    }
}

/// Which of the two supported chains to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    Mainnet,
    Testnet,
}

/// Exactly one production and one test chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworksConfig {
    pub mainnet: NetworkConfig,
    pub testnet: NetworkConfig,
}

impl NetworksConfig {
    pub fn get(&self, kind: NetworkKind) -> &NetworkConfig {
        match kind {
            NetworkKind::Mainnet => &self.mainnet,
            NetworkKind::Testnet => &self.testnet,
        }
    }

    /// Resolve a chain id to a supported network.
    pub fn by_chain_id(&self, chain_id: u64) -> Option<&NetworkConfig> {
        self.iter().find(|network| network.chain_id == chain_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkConfig> {
        [&self.mainnet, &self.testnet].into_iter()
    }
}

impl Default for NetworksConfig {
    fn default() -> Self {
        Self {
            mainnet: NetworkConfig {
                name: "Linea".to_string(),
                chain_id: 59144,
                rpc_url: "https://rpc.linea.build".to_string(),
                tx_explorer_url: "https://lineascan.build/tx/".to_string(),
                attestation_explorer_url: "https://explorer.ver.ax/linea/attestations/"
                    .to_string(),
            },
            testnet: NetworkConfig {
                name: "Linea Sepolia".to_string(),
                chain_id: 59141,
                rpc_url: "https://rpc.sepolia.linea.build".to_string(),
                tx_explorer_url: "https://sepolia.lineascan.build/tx/".to_string(),
                attestation_explorer_url: "https://explorer.ver.ax/linea-sepolia/attestations/"
                    .to_string(),
            },
        }
    }
}

/// A single supported chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Display name.
    pub name: String,

    /// EIP-155 chain id.
    pub chain_id: u64,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Block explorer prefix; the transaction hash is appended.
    pub tx_explorer_url: String,

    /// Attestation explorer prefix; the attestation id is appended.
    pub attestation_explorer_url: String,
}

/// Receipt polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Per-call RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Delay between receipt polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Give up waiting for inclusion after this many seconds.
    pub timeout_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            rpc_timeout_secs: 10,
            poll_interval_ms: 2000,
            timeout_secs: 300,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
