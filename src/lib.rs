//! Proof of Audit: attest that a contract was audited at a given commit.

pub mod attestation;
pub mod blockchain;
pub mod config;
pub mod form;
pub mod observability;
pub mod session;
pub mod view;

pub use attestation::Orchestrator;
pub use config::AppConfig;
pub use form::{FormStore, SubmissionStatus};
pub use session::Session;
