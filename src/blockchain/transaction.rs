//! Transaction signing, broadcast and receipt waiting over JSON-RPC.
//!
//! # Responsibilities
//! - Refuse to sign when the gas price is above the configured ceiling
//! - Sign and broadcast through a wallet-filled provider
//! - Poll for the receipt under a deadline, honouring confirmation depth

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, Receipt};
use crate::blockchain::wallet::Wallet;
use crate::config::WorkflowConfig;
use crate::contracts::ContractCall;
use crate::resilience::PollSchedule;
use crate::workflow::gateway::ChainGateway;

/// Account address plus a provider that signs as that account.
struct Signer {
    address: Address,
    provider: Arc<dyn Provider + Send + Sync>,
}

/// `ChainGateway` backed by a live RPC endpoint.
pub struct RpcGateway {
    client: BlockchainClient,
    signer: Option<Signer>,
    schedule: PollSchedule,
    confirmation_timeout: Duration,
}

impl RpcGateway {
    /// Build a gateway. Without a wallet every submission fails, which only
    /// matters if a caller bypasses the session check.
    pub fn new(
        client: BlockchainClient,
        wallet: Option<&Wallet>,
        workflow: &WorkflowConfig,
    ) -> BlockchainResult<Self> {
        let signer = match wallet {
            Some(wallet) => {
                let url: url::Url = client.config().rpc_url.parse().map_err(|e| {
                    BlockchainError::Rpc(format!(
                        "Invalid RPC URL '{}': {}",
                        client.config().rpc_url,
                        e
                    ))
                })?;
                let provider = ProviderBuilder::new()
                    .wallet(wallet.ethereum_wallet())
                    .connect_http(url);
                Some(Signer {
                    address: wallet.address(),
                    provider: Arc::new(provider),
                })
            }
            None => None,
        };

        Ok(Self {
            client,
            signer,
            schedule: PollSchedule::new(workflow.poll_base_delay_ms, workflow.poll_max_delay_ms),
            confirmation_timeout: Duration::from_secs(workflow.confirmation_timeout_secs),
        })
    }

    async fn check_gas_price(&self) -> BlockchainResult<()> {
        let gas_price = self.client.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;
        let max_gwei = self.client.config().max_gas_price_gwei;

        if gas_price_gwei > max_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei,
            });
        }
        Ok(())
    }

    async fn poll_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Receipt> {
        let required = self.client.confirmation_blocks() as u64;
        let mut attempt = 0u32;

        loop {
            sleep(self.schedule.delay(attempt)).await;
            attempt = attempt.saturating_add(1);

            let Some(receipt) = self.client.get_transaction_receipt(tx_hash).await? else {
                tracing::debug!(tx_hash = %tx_hash, attempt, "Transaction pending");
                continue;
            };

            if !receipt.status() {
                return Err(BlockchainError::Reverted(tx_hash));
            }

            if required > 0 {
                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // The including block is the first confirmation.
                let confirmations = current_block.saturating_sub(tx_block) + 1;
                if confirmations < required {
                    tracing::debug!(
                        tx_hash = %tx_hash,
                        confirmations,
                        required,
                        "Waiting for confirmations"
                    );
                    continue;
                }
            }

            return Ok(Receipt::from(&receipt));
        }
    }
}

impl ChainGateway for RpcGateway {
    async fn submit(&self, from: Address, call: &ContractCall) -> BlockchainResult<TxHash> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| BlockchainError::Wallet("No account connected".to_string()))?;
        if signer.address != from {
            return Err(BlockchainError::Wallet(format!(
                "Account {} is not managed by this gateway",
                from
            )));
        }

        self.check_gas_price().await?;

        let tx = call.to_transaction_request(from);
        let deadline = self.client.timeout();
        let pending = match timeout(deadline, signer.provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(BlockchainError::Submission(e.to_string())),
            Err(_) => return Err(BlockchainError::Timeout(deadline.as_millis() as u64)),
        };

        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Receipt> {
        match timeout(self.confirmation_timeout, self.poll_receipt(tx_hash)).await {
            Ok(result) => result,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                secs: self.confirmation_timeout.as_secs(),
            }),
        }
    }
}

impl std::fmt::Debug for RpcGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcGateway")
            .field("client", &self.client)
            .field("account", &self.signer.as_ref().map(|s| s.address))
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::{BlockchainConfig, ChainId};
    use crate::contracts::ContractHandle;
    use alloy::primitives::Bytes;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn offline_client() -> BlockchainClient {
        BlockchainClient::new(BlockchainConfig {
            rpc_url: "http://127.0.0.1:9".to_string(),
            rpc_timeout_secs: 2,
            ..BlockchainConfig::default()
        })
        .unwrap()
    }

    fn install_call() -> ContractCall {
        ContractHandle::new(Address::repeat_byte(0xfa), ChainId(1))
            .prepare_install_module(Address::repeat_byte(0x0d), Bytes::new())
    }

    #[tokio::test]
    async fn test_submit_without_wallet() {
        let gateway = RpcGateway::new(offline_client(), None, &WorkflowConfig::default()).unwrap();
        let err = gateway.submit(Address::ZERO, &install_call()).await.unwrap_err();
        assert!(err.to_string().contains("No account connected"));
    }

    #[tokio::test]
    async fn test_submit_from_foreign_account() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let gateway =
            RpcGateway::new(offline_client(), Some(&wallet), &WorkflowConfig::default()).unwrap();
        let err = gateway
            .submit(Address::repeat_byte(0xaa), &install_call())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not managed"));
    }

    #[tokio::test]
    async fn test_submit_fails_when_rpc_unreachable() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let gateway =
            RpcGateway::new(offline_client(), Some(&wallet), &WorkflowConfig::default()).unwrap();
        let result = gateway.submit(wallet.address(), &install_call()).await;
        assert!(matches!(result, Err(BlockchainError::Rpc(_))));
    }

    #[tokio::test]
    async fn test_receipt_wait_propagates_rpc_failure() {
        let workflow = WorkflowConfig {
            poll_base_delay_ms: 10,
            poll_max_delay_ms: 10,
            ..WorkflowConfig::default()
        };
        let gateway = RpcGateway::new(offline_client(), None, &workflow).unwrap();
        let result = gateway.wait_for_receipt(TxHash::ZERO).await;
        assert!(matches!(result, Err(BlockchainError::Rpc(_))));
    }
}
