//! Attestation form subsystem.
//!
//! # Data Flow
//! ```text
//! keystroke  → store.rs field_changed → validator.rs (that field)
//! submit     → store.rs begin_submit  → validator.rs (all fields)
//!            → wallet / network / client / pending gates
//!            → Submission::run → attestation::Orchestrator
//!            → status.rs StatusHandle (watch channel) → view
//! ```
//!
//! # Design Decisions
//! - The field set is closed, so values and errors are fixed three-field records
//! - Status is an enum so payloads only exist in the state they belong to
//! - One attempt at a time; a second submit while pending is rejected

pub mod status;
pub mod store;
pub mod validator;
pub mod values;

pub use status::{StatusHandle, SubmissionStatus};
pub use store::{FormStore, SubmitBlocker, SubmitRejected, Submission};
pub use validator::{validate, Field, UnknownField};
pub use values::{FormErrors, FormValues};
