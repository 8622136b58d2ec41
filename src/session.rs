//! Active account and chain.
//!
//! Stands in for a browser wallet: the account is the locally held signer,
//! the chain is whatever the RPC endpoint reports. Either can be missing,
//! in which case the workflow does nothing.

use alloy::primitives::Address;
use serde::Serialize;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::{Wallet, PRIVATE_KEY_ENV_VAR};
use crate::config::AppMetadata;
use crate::observability::metrics;

/// Snapshot of the connected account and chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    pub account: Option<Address>,
    pub chain: Option<ChainId>,
}

impl Session {
    pub fn new(account: Option<Address>, chain: Option<ChainId>) -> Self {
        Self { account, chain }
    }

    /// Account and chain, if both are present.
    pub fn active(&self) -> Option<(Address, ChainId)> {
        self.account.zip(self.chain)
    }
}

/// Resolves a `Session` from a wallet and an RPC client.
#[derive(Debug)]
pub struct SessionProvider {
    app: AppMetadata,
    client: BlockchainClient,
    wallet: Option<Wallet>,
}

impl SessionProvider {
    pub fn new(app: AppMetadata, client: BlockchainClient, wallet: Option<Wallet>) -> Self {
        Self {
            app,
            client,
            wallet,
        }
    }

    /// Read the account from `DEPLOYER_PRIVATE_KEY`, if set.
    pub fn from_env(app: AppMetadata, client: BlockchainClient) -> BlockchainResult<Self> {
        Ok(Self::new(app, client, Wallet::from_env()?))
    }

    /// Query the chain and report what is connected.
    ///
    /// An unreachable RPC leaves the chain absent; a chain that answers with
    /// the wrong ID is an error.
    pub async fn connect(&self) -> BlockchainResult<Session> {
        tracing::info!(app_name = %self.app.name, app_url = %self.app.url, "Connecting session");

        let chain = match self.client.verify_chain_id().await {
            Ok(chain) => {
                metrics::record_rpc_health(true);
                Some(chain)
            }
            Err(e @ BlockchainError::ChainMismatch { .. }) => {
                metrics::record_rpc_health(true);
                return Err(e);
            }
            Err(e) => {
                metrics::record_rpc_health(false);
                tracing::warn!(error = %e, "Chain unavailable");
                None
            }
        };
        let account = self.wallet.as_ref().map(Wallet::address);

        if account.is_none() {
            tracing::warn!("No account connected, set {}", PRIVATE_KEY_ENV_VAR);
        }
        tracing::info!(account = ?account, chain = ?chain, "Session resolved");

        Ok(Session::new(account, chain))
    }

    pub fn app(&self) -> &AppMetadata {
        &self.app
    }

    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }

    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::BlockchainConfig;

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

    #[test]
    fn test_session_active() {
        assert_eq!(Session::default().active(), None);
        assert_eq!(Session::new(Some(Address::ZERO), None).active(), None);
        assert_eq!(Session::new(None, Some(ChainId(1))).active(), None);
        assert_eq!(
            Session::new(Some(Address::ZERO), Some(ChainId(1))).active(),
            Some((Address::ZERO, ChainId(1)))
        );
    }

    #[tokio::test]
    async fn test_unreachable_chain_leaves_chain_absent() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let address = wallet.address();
        let provider = SessionProvider::new(AppMetadata::default(), offline_client(), Some(wallet));

        let session = provider.connect().await.unwrap();
        assert_eq!(session.account, Some(address));
        assert_eq!(session.chain, None);
        assert_eq!(session.active(), None);
    }

    #[tokio::test]
    async fn test_no_wallet_leaves_account_absent() {
        let provider = SessionProvider::new(AppMetadata::default(), offline_client(), None);
        let session = provider.connect().await.unwrap();
        assert_eq!(session.account, None);
    }
}
