//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + config (RPC URL, chain id)
//!     → wallet.rs (key loading)
//!     → client.rs (read-only RPC with failover and timeouts)
//!     → transaction.rs (sign, broadcast, wait for receipt)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::RpcGateway;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId, Receipt};
pub use wallet::Wallet;
