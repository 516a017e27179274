//! Attestation subsystem.
//!
//! `request.rs` turns validated form values into an [`AttestationRequest`],
//! `orchestrator.rs` submits it and waits for confirmation, and `types.rs`
//! defines the registry and receipt ports the orchestrator talks to.

pub mod orchestrator;
pub mod request;
pub mod types;

pub use orchestrator::Orchestrator;
pub use request::{AttestationRequest, AttestationSettings, AuditRecord};
pub use types::{
    AttestOutcome, AttestationClient, AttestationError, AttestationResult, ConfirmedReceipt,
    ReceiptWaiter, GENERIC_FAILURE, NO_ATTESTATION_ID, NO_TRANSACTION_HASH,
};
