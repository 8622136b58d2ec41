//! Deterministic deployment salt.

use alloy::primitives::B256;

/// Salt prefix used when nothing else is configured.
pub const DEFAULT_SALT_PREFIX: [u8; 2] = [0x01, 0x01];

/// Trailing salt byte used when nothing else is configured.
pub const DEFAULT_SALT_SUFFIX: u8 = 0x10;

/// Two prefix bytes, zero padding, and `suffix` in the final byte.
///
/// Depends on nothing but its arguments, so every call yields the same salt.
pub fn compute_salt(prefix: [u8; 2], suffix: u8) -> B256 {
    let mut salt = [0u8; 32];
    salt[..2].copy_from_slice(&prefix);
    salt[31] = suffix;
    B256::from(salt)
}
