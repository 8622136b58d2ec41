//! Configuration validation.
//!
//! Serde handles syntax; this module checks values: addresses parse, URLs
//! parse, timeouts are positive. All errors are returned, not just the first.

use std::fmt;

use alloy::primitives::Address;

use crate::config::schema::DeployerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DeployerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.app.url).is_err() {
        errors.push(ValidationError::new("app.url", "not a valid URL"));
    }

    let chain = &config.blockchain;
    if url::Url::parse(&chain.rpc_url).is_err() {
        errors.push(ValidationError::new("blockchain.rpc_url", "not a valid URL"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.rpc_timeout_secs",
            "must be greater than zero",
        ));
    }

    let contracts = &config.contracts;
    for (field, value) in [
        ("contracts.factory_address", &contracts.factory_address),
        ("contracts.implementation_address", &contracts.implementation_address),
        ("contracts.module_address", &contracts.module_address),
    ] {
        if value.parse::<Address>().is_err() {
            errors.push(ValidationError::new(field, format!("invalid address '{}'", value)));
        }
    }
    if parse_salt_prefix(&contracts.salt_prefix).is_none() {
        errors.push(ValidationError::new("contracts.salt_prefix", "must be exactly 2 hex bytes"));
    }

    let workflow = &config.workflow;
    if workflow.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "workflow.confirmation_timeout_secs",
            "must be greater than zero",
        ));
    }
    if workflow.poll_base_delay_ms > workflow.poll_max_delay_ms {
        errors.push(ValidationError::new(
            "workflow.poll_base_delay_ms",
            "must not exceed workflow.poll_max_delay_ms",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a valid socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a `0x`-optional hex string of exactly two bytes.
pub fn parse_salt_prefix(value: &str) -> Option<[u8; 2]> {
    let hex = value.strip_prefix("0x").unwrap_or(value);
    if hex.len() != 4 {
        return None;
    }
    let hi = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let lo = u8::from_str_radix(&hex[2..4], 16).ok()?;
    Some([hi, lo])
}
