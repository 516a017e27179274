//! Field validation.
//!
//! Every check is a pure function of its input. The same field and value
//! always produce the same message.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use alloy::primitives::Address;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Full 40-character lowercase commit hash. Uppercase hex is rejected.
static COMMIT_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("commit hash pattern"));

/// `https://github.com/<owner>/<repo>` with nothing after the repo segment.
static REPO_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://github\.com/[^/]+/[^/]+$").expect("repo url pattern"));

static HEX_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern"));

pub const REPO_URL_ERROR: &str = "GitHub repo URL is not valid.";
pub const COMMIT_HASH_ERROR: &str = "Commit hash is not valid.";
pub const CONTRACT_ADDRESS_ERROR: &str = "Contract address is not valid.";

/// The three inputs of the attestation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    RepoUrl,
    CommitHash,
    ContractAddress,
}

impl Field {
    /// All fields in render order.
    pub const ALL: [Field; 3] = [Field::RepoUrl, Field::CommitHash, Field::ContractAddress];

    /// Input name used by the form.
    pub fn name(&self) -> &'static str {
        match self {
            Field::RepoUrl => "repoUrl",
            Field::CommitHash => "commitHash",
            Field::ContractAddress => "contractAddress",
        }
    }

    /// Placeholder label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Field::RepoUrl => "GitHub Repo URL",
            Field::CommitHash => "Commit Hash",
            Field::ContractAddress => "Smart contract address",
        }
    }

    /// Check a raw value, returning the user-facing message on failure.
    pub fn check(&self, value: &str) -> Result<(), &'static str> {
        let valid = match self {
            Field::RepoUrl => REPO_URL.is_match(value),
            Field::CommitHash => COMMIT_HASH.is_match(value),
            Field::ContractAddress => is_address(value),
        };

        if valid {
            Ok(())
        } else {
            Err(self.error_message())
        }
    }

    fn error_message(&self) -> &'static str {
        match self {
            Field::RepoUrl => REPO_URL_ERROR,
            Field::CommitHash => COMMIT_HASH_ERROR,
            Field::ContractAddress => CONTRACT_ADDRESS_ERROR,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name does not belong to any form field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Validate a value by field name.
///
/// Returns an empty string when the value is valid. Names that do not map to
/// a known field are always valid.
pub fn validate(field_name: &str, value: &str) -> &'static str {
    match field_name.parse::<Field>() {
        Ok(field) => field.check(value).err().unwrap_or(""),
        Err(_) => "",
    }
}

/// EVM account address check.
///
/// Single-case bodies are accepted as-is; mixed case must carry a valid
/// EIP-55 checksum.
fn is_address(value: &str) -> bool {
    if !HEX_ADDRESS.is_match(value) {
        return false;
    }

    let body = &value[2..];
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(value, None).is_ok();
    }
    true
}
