//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key)
//!     → wallet.rs (key loading)
//!     → portal.rs (encode, sign, broadcast `attest`)
//!     → client.rs (receipt polling with timeouts)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod portal;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use portal::PortalClient;
pub use types::{BlockchainError, BlockchainResult, ChainId};
pub use wallet::Wallet;
