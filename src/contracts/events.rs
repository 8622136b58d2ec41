//! Event log decoding.

use alloy::primitives::{Address, Log};
use alloy::sol_types::SolEvent;

use crate::contracts::abi::ProxyDeployed;

/// Every `ProxyDeployed` event in `logs`, in log order. Logs with another
/// signature or malformed data are skipped.
pub fn decode_proxy_deployed(logs: &[Log]) -> impl Iterator<Item = ProxyDeployed> + '_ {
    logs.iter()
        .filter(|log| log.topics().first() == Some(&ProxyDeployed::SIGNATURE_HASH))
        .filter_map(|log| ProxyDeployed::decode_log_data(&log.data).ok())
}

/// The `proxy` field of the first `ProxyDeployed` event, if any.
pub fn extract_proxy_address(logs: &[Log]) -> Option<Address> {
    decode_proxy_deployed(logs).next().map(|event| event.proxy)
}
