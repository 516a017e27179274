//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse registry identifiers into their on-chain types
//! - Validate value ranges (timeouts > 0, validity > 0)
//! - Reject two networks sharing a chain id
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::{Address, B256};
use thiserror::Error;

use crate::attestation::AttestationSettings;
use crate::config::schema::{AppConfig, AttestationConfig, NetworkConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("attestation.portal_id '{0}' is not an address")]
    PortalId(String),

    #[error("attestation.schema_id '{0}' is not a 32-byte hex value")]
    SchemaId(String),

    #[error("attestation.validity_secs must be greater than zero")]
    Validity,

    #[error("networks.{network}.{field} '{value}' is not a valid URL")]
    Url {
        network: String,
        field: &'static str,
        value: String,
    },

    #[error("networks.mainnet and networks.testnet share chain id {0}")]
    DuplicateChainId(u64),

    #[error("confirmation.{0} must be greater than zero")]
    Confirmation(&'static str),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(mut attestation) = config.attestation.settings() {
        errors.append(&mut attestation);
    }

    let networks = &config.networks;
    check_network("mainnet", &networks.mainnet, &mut errors);
    check_network("testnet", &networks.testnet, &mut errors);
    if networks.mainnet.chain_id == networks.testnet.chain_id {
        errors.push(ValidationError::DuplicateChainId(networks.mainnet.chain_id));
    }

    let confirmation = &config.confirmation;
    if confirmation.rpc_timeout_secs == 0 {
        errors.push(ValidationError::Confirmation("rpc_timeout_secs"));
    }
    if confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::Confirmation("poll_interval_ms"));
    }
    if confirmation.timeout_secs == 0 {
        errors.push(ValidationError::Confirmation("timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl AttestationConfig {
    /// Parse into the typed settings the orchestrator consumes.
    pub fn settings(&self) -> Result<AttestationSettings, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let portal_id = self.portal_id.parse::<Address>().ok();
        if portal_id.is_none() {
            errors.push(ValidationError::PortalId(self.portal_id.clone()));
        }
        let schema_id = self.schema_id.parse::<B256>().ok();
        if schema_id.is_none() {
            errors.push(ValidationError::SchemaId(self.schema_id.clone()));
        }
        if self.validity_secs == 0 {
            errors.push(ValidationError::Validity);
        }

        match (portal_id, schema_id) {
            (Some(portal_id), Some(schema_id)) if errors.is_empty() => Ok(AttestationSettings {
                portal_id,
                schema_id,
                validity_secs: self.validity_secs,
            }),
            _ => Err(errors),
        }
    }
}

fn check_network(key: &str, network: &NetworkConfig, errors: &mut Vec<ValidationError>) {
    let urls = [
        ("rpc_url", &network.rpc_url),
        ("tx_explorer_url", &network.tx_explorer_url),
        ("attestation_explorer_url", &network.attestation_explorer_url),
    ];
    for (field, value) in urls {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::Url {
                network: key.to_string(),
                field,
                value: value.clone(),
            });
        }
    }
}
