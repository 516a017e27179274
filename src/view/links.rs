//! Explorer links for transactions and attestations.

use alloy::primitives::{TxHash, B256};

use crate::config::NetworkConfig;

/// URL builders for one network.
#[derive(Debug, Clone, Copy)]
pub struct ExplorerLinks<'a> {
    network: &'a NetworkConfig,
}

impl<'a> ExplorerLinks<'a> {
    pub fn new(network: &'a NetworkConfig) -> Self {
        Self { network }
    }

    pub fn transaction(&self, tx_hash: TxHash) -> String {
        format!("{}{}", self.network.tx_explorer_url, tx_hash)
    }

    pub fn attestation(&self, attestation_id: B256) -> String {
        format!("{}{}", self.network.attestation_explorer_url, attestation_id)
    }
}

/// Shorten a hex string to `0x12345...abcde`.
///
/// Strings too short to shorten are returned unchanged.
pub fn truncate_hex(hex: &str) -> String {
    if hex.len() <= 12 || !hex.is_ascii() {
        return hex.to_string();
    }
    format!("{}...{}", &hex[..7], &hex[hex.len() - 5..])
}
