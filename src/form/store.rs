//! Form state: values, errors and submission status.
//!
//! Field edits revalidate only the edited field. A submit request
//! revalidates all three at once and, only when the form is clean and the
//! wallet context allows it, produces a [`Submission`] that runs the
//! orchestrator.

use alloy::primitives::Address;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::attestation::Orchestrator;
use crate::blockchain::ChainId;
use crate::form::status::{StatusHandle, SubmissionStatus};
use crate::form::validator::Field;
use crate::form::values::{FormErrors, FormValues};
use crate::session::{NetworkState, Session};

/// Why the submit control is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitBlocker {
    #[error("connect a wallet to issue an attestation")]
    NoWallet,

    #[error("chain {0} is not supported, switch to Linea or Linea Sepolia")]
    UnsupportedNetwork(u64),

    #[error("attestation client is not initialized for this network")]
    NoClient,

    #[error("{0} is required")]
    EmptyField(Field),

    #[error("{0} is not valid")]
    InvalidField(Field),

    #[error("a submission is already pending")]
    Pending,
}

/// Reasons a submit request did not start an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    /// At least one field failed revalidation.
    #[error("form has invalid fields")]
    Invalid(FormErrors),

    #[error(transparent)]
    Blocked(SubmitBlocker),
}

/// Editable attestation form.
#[derive(Debug)]
pub struct FormStore {
    values: FormValues,
    errors: FormErrors,
    status: StatusHandle,
    in_flight: Arc<Mutex<()>>,
}

impl FormStore {
    pub fn new() -> Self {
        Self {
            values: FormValues::default(),
            errors: FormErrors::default(),
            status: StatusHandle::new(),
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status.current()
    }

    pub fn status_handle(&self) -> &StatusHandle {
        &self.status
    }

    /// Update one field and revalidate just that field.
    pub fn field_changed(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let message = field.check(&value).err().unwrap_or("");
        self.values.set(field, value);
        self.errors.set(field, message);
    }

    /// The first reason submission is currently disabled, if any.
    ///
    /// Checked in order: wallet, network, client, empty fields, field errors,
    /// in-flight attempt.
    pub fn submit_blocker(&self, session: &Session) -> Option<SubmitBlocker> {
        if session.account().is_none() {
            return Some(SubmitBlocker::NoWallet);
        }
        if let NetworkState::Unsupported(chain_id) = session.network_state() {
            return Some(SubmitBlocker::UnsupportedNetwork(chain_id));
        }
        if session.orchestrator().is_none() {
            return Some(SubmitBlocker::NoClient);
        }
        if let Some(field) = self.values.first_empty() {
            return Some(SubmitBlocker::EmptyField(field));
        }
        if let Some(field) = self.errors.first_invalid() {
            return Some(SubmitBlocker::InvalidField(field));
        }
        if self.status.is_pending() || self.in_flight.try_lock().is_err() {
            return Some(SubmitBlocker::Pending);
        }
        None
    }

    pub fn is_submit_disabled(&self, session: &Session) -> bool {
        self.submit_blocker(session).is_some()
    }

    /// Handle a submit request.
    ///
    /// All fields are revalidated first; an invalid form never reaches the
    /// wallet checks. On success the previous attempt's transaction,
    /// attestation id and error are cleared before the new attempt is handed
    /// back to the caller to run.
    pub fn begin_submit(&mut self, session: &Session) -> Result<Submission, SubmitRejected> {
        self.errors = FormErrors::revalidate_all(&self.values);
        if !self.errors.is_clean() {
            return Err(SubmitRejected::Invalid(self.errors.clone()));
        }

        if let Some(blocker) = self.submit_blocker(session) {
            tracing::debug!(%blocker, "Submit blocked");
            return Err(SubmitRejected::Blocked(blocker));
        }

        let guard = Arc::clone(&self.in_flight)
            .try_lock_owned()
            .map_err(|_| SubmitRejected::Blocked(SubmitBlocker::Pending))?;

        // A client only exists for a connected account on a supported chain.
        let (Some(account), Some(chain_id), Some(orchestrator)) =
            (session.account(), session.chain_id(), session.orchestrator())
        else {
            return Err(SubmitRejected::Blocked(SubmitBlocker::NoClient));
        };

        self.status.reset();

        Ok(Submission {
            values: self.values.clone(),
            account,
            network: ChainId(chain_id),
            orchestrator: orchestrator.clone(),
            status: self.status.clone(),
            _guard: guard,
        })
    }
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

/// An accepted submit request.
///
/// Holds the form snapshot taken at submit time and the exclusive attempt
/// slot; a second submission cannot start until this one is run or dropped.
pub struct Submission {
    values: FormValues,
    account: Address,
    network: ChainId,
    orchestrator: Orchestrator,
    status: StatusHandle,
    _guard: OwnedMutexGuard<()>,
}

impl Submission {
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Where this attempt publishes its transitions.
    pub fn status_handle(&self) -> &StatusHandle {
        &self.status
    }

    /// Run the attempt to its terminal status and return it.
    pub async fn run(self) -> SubmissionStatus {
        self.orchestrator
            .issue_attestation(self.values, self.account, self.network, &self.status)
            .await;
        self.status.current()
    }
}

impl std::fmt::Debug for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submission")
            .field("values", &self.values)
            .field("account", &self.account)
            .field("network", &self.network)
            .finish()
    }
}
