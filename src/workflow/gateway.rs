//! The seam between the workflow and the chain.

use std::future::Future;

use alloy::primitives::{Address, TxHash};

use crate::blockchain::types::{BlockchainResult, Receipt};
use crate::contracts::ContractCall;

/// Submits prepared calls and waits for their receipts.
///
/// `RpcGateway` is the production implementation; tests substitute an
/// in-memory one.
pub trait ChainGateway: Send + Sync {
    /// Sign and broadcast `call` from `from`. Resolves once the node has
    /// accepted the transaction.
    fn submit(
        &self,
        from: Address,
        call: &ContractCall,
    ) -> impl Future<Output = BlockchainResult<TxHash>> + Send;

    /// Resolve once `tx_hash` is included and successful.
    fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<Receipt>> + Send;
}
