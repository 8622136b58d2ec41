//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the deployer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the deployer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeployerConfig {
    /// Application metadata shown when a session connects.
    pub app: AppMetadata,

    /// Blockchain integration settings.
    pub blockchain: BlockchainConfig,

    /// Contract addresses and salt parts.
    pub contracts: ContractsConfig,

    /// Workflow behaviour.
    pub workflow: WorkflowConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppMetadata {
    pub name: String,
    pub url: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "Example app".to_string(),
            url: "https://example.com".to_string(),
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Block confirmations required before a receipt is accepted. The
    /// including block counts as the first; 0 skips the depth check.
    pub confirmation_blocks: u32,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
            confirmation_blocks: 0,
            max_gas_price_gwei: 500,
        }
    }
}

/// Contract addresses used by the workflow.
///
/// Addresses are kept as strings so a bad value surfaces as a validation
/// error rather than a parse failure of the whole file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Proxy factory that both calls are sent to.
    pub factory_address: String,

    /// Implementation the proxy delegates to.
    pub implementation_address: String,

    /// Module installed after deployment.
    pub module_address: String,

    /// Two leading salt bytes, hex encoded.
    pub salt_prefix: String,

    /// Trailing salt byte.
    pub salt_suffix: u8,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            factory_address: "0xB83db4b940e4796aA1f53DBFC824B9B1865835D5".to_string(),
            implementation_address: "0xa6b59721ac0cad7a4f502914b5872b6782a09085".to_string(),
            module_address: "0xB96b2328EA4946cf7785B8797a084e27e6aCf062".to_string(),
            salt_prefix: "0x0101".to_string(),
            salt_suffix: 0x10,
        }
    }
}

/// Which contract receives the `installModule` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstallTarget {
    /// The factory handle the deploy call went to.
    #[default]
    Factory,
    /// The proxy recovered from the `ProxyDeployed` event.
    DeployedProxy,
}

/// Workflow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Target of the install call.
    pub install_target: InstallTarget,

    /// Deadline for each receipt wait in seconds.
    pub confirmation_timeout_secs: u64,

    /// Reject a run while another is in flight.
    pub guard_reentrancy: bool,

    /// Base delay between receipt polls in milliseconds.
    pub poll_base_delay_ms: u64,

    /// Maximum delay between receipt polls in milliseconds.
    pub poll_max_delay_ms: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            install_target: InstallTarget::Factory,
            confirmation_timeout_secs: 120,
            guard_reentrancy: true,
            poll_base_delay_ms: 500,
            poll_max_delay_ms: 4000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
