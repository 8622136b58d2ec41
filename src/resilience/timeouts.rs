//! Deadlines for external calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Run an RPC future under a deadline, mapping both its error and an
/// elapsed deadline into `BlockchainError`.
pub async fn rpc_deadline<T, E, F>(duration: Duration, fut: F) -> BlockchainResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match timeout(duration, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
        Err(_) => Err(BlockchainError::Timeout(duration.as_millis() as u64)),
    }
}
