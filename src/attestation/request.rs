//! Attestation request construction.

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::attestation::types::{AttestationError, AttestationResult};
use crate::form::FormValues;

/// Registry routing and validity settings, fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttestationSettings {
    pub portal_id: Address,
    pub schema_id: B256,
    pub validity_secs: u64,
}

/// One payload entry: what was audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub commit_hash: String,
    pub repo_url: String,
}

/// Immutable request handed to the attestation client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationRequest {
    pub portal_id: Address,
    pub schema_id: B256,
    /// Unix timestamp (seconds) after which the attestation is expired.
    pub expiration_date: u64,
    /// The audited contract.
    pub subject: Address,
    pub attestation_data: Vec<AuditRecord>,
}

impl AttestationRequest {
    /// Build the request for `values` as of `issued_at` (unix seconds).
    pub fn build(
        values: &FormValues,
        settings: &AttestationSettings,
        issued_at: u64,
    ) -> AttestationResult<Self> {
        let subject: Address = values.contract_address.parse().map_err(|e| {
            AttestationError::InvalidRequest(format!(
                "contract address '{}': {}",
                values.contract_address, e
            ))
        })?;

        Ok(Self {
            portal_id: settings.portal_id,
            schema_id: settings.schema_id,
            expiration_date: issued_at.saturating_add(settings.validity_secs),
            subject,
            attestation_data: vec![AuditRecord {
                commit_hash: values.commit_hash.clone(),
                repo_url: values.repo_url.clone(),
            }],
        })
    }
}

/// Current wall clock as unix seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
