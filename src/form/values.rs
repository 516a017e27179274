//! Form values and their mirrored error messages.

use serde::{Deserialize, Serialize};

use crate::form::validator::Field;

/// Raw text of the three form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub repo_url: String,
    pub commit_hash: String,
    pub contract_address: String,
}

impl FormValues {
    pub fn new(
        repo_url: impl Into<String>,
        commit_hash: impl Into<String>,
        contract_address: impl Into<String>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            commit_hash: commit_hash.into(),
            contract_address: contract_address.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::RepoUrl => &self.repo_url,
            Field::CommitHash => &self.commit_hash,
            Field::ContractAddress => &self.contract_address,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::RepoUrl => self.repo_url = value,
            Field::CommitHash => self.commit_hash = value,
            Field::ContractAddress => self.contract_address = value,
        }
    }

    /// First field (in render order) whose value is empty.
    pub fn first_empty(&self) -> Option<Field> {
        Field::ALL.into_iter().find(|field| self.get(*field).is_empty())
    }
}

/// Per-field error text. An empty string means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormErrors {
    pub repo_url: String,
    pub commit_hash: String,
    pub contract_address: String,
}

impl FormErrors {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::RepoUrl => &self.repo_url,
            Field::CommitHash => &self.commit_hash,
            Field::ContractAddress => &self.contract_address,
        }
    }

    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        let message = message.into();
        match field {
            Field::RepoUrl => self.repo_url = message,
            Field::CommitHash => self.commit_hash = message,
            Field::ContractAddress => self.contract_address = message,
        }
    }

    /// Recompute every entry from `values` in one pass.
    pub fn revalidate_all(values: &FormValues) -> Self {
        let mut errors = Self::default();
        for field in Field::ALL {
            errors.set(field, field.check(values.get(field)).err().unwrap_or(""));
        }
        errors
    }

    /// First field (in render order) carrying an error.
    pub fn first_invalid(&self) -> Option<Field> {
        Field::ALL.into_iter().find(|field| !self.get(*field).is_empty())
    }

    pub fn is_clean(&self) -> bool {
        self.first_invalid().is_none()
    }
}
