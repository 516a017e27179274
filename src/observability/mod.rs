//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! form / session / attestation / blockchain
//!     → tracing events with structured fields
//!     → logging.rs subscriber (stderr)
//! ```
//!
//! # Design Decisions
//! - stdout is reserved for the rendered form and banners
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_logging;
