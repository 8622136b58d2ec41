//! Deploy-proxy then install-module pipeline.

use alloy::primitives::{address, Address, Bytes, TxHash, B256};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::types::{BlockchainError, ChainId};
use crate::config::validation::parse_salt_prefix;
use crate::config::{DeployerConfig, InstallTarget};
use crate::contracts::{extract_proxy_address, ContractCall, ContractHandle};
use crate::observability::metrics;
use crate::session::Session;
use crate::workflow::gateway::ChainGateway;
use crate::workflow::salt::{compute_salt, DEFAULT_SALT_PREFIX, DEFAULT_SALT_SUFFIX};
use crate::workflow::{WorkflowError, WorkflowResult, WorkflowStep};

/// Resolved addresses and salt parts for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub factory: Address,
    pub implementation: Address,
    pub module: Address,
    pub salt_prefix: [u8; 2],
    pub salt_suffix: u8,
    pub install_target: InstallTarget,
}

impl WorkflowSettings {
    pub fn from_config(config: &DeployerConfig) -> WorkflowResult<Self> {
        let contracts = &config.contracts;
        Ok(Self {
            factory: parse_address("contracts.factory_address", &contracts.factory_address)?,
            implementation: parse_address(
                "contracts.implementation_address",
                &contracts.implementation_address,
            )?,
            module: parse_address("contracts.module_address", &contracts.module_address)?,
            salt_prefix: parse_salt_prefix(&contracts.salt_prefix).ok_or_else(|| {
                WorkflowError::Config(format!("contracts.salt_prefix: '{}'", contracts.salt_prefix))
            })?,
            salt_suffix: contracts.salt_suffix,
            install_target: config.workflow.install_target,
        })
    }

    /// The salt every run uses.
    pub fn salt(&self) -> B256 {
        compute_salt(self.salt_prefix, self.salt_suffix)
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            factory: address!("b83db4b940e4796aa1f53dbfc824b9b1865835d5"),
            implementation: address!("a6b59721ac0cad7a4f502914b5872b6782a09085"),
            module: address!("b96b2328ea4946cf7785b8797a084e27e6acf062"),
            salt_prefix: DEFAULT_SALT_PREFIX,
            salt_suffix: DEFAULT_SALT_SUFFIX,
            install_target: InstallTarget::Factory,
        }
    }
}

fn parse_address(field: &str, value: &str) -> WorkflowResult<Address> {
    value
        .parse()
        .map_err(|e| WorkflowError::Config(format!("{}: '{}': {}", field, value, e)))
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowOutcome {
    pub run_id: Uuid,
    pub account: Address,
    pub chain: ChainId,
    pub salt: B256,
    pub deploy_tx: TxHash,
    /// `None` when the deploy receipt carried no `ProxyDeployed` event.
    pub proxy: Option<Address>,
    pub install_target: Address,
    pub install_tx: TxHash,
}

/// Runs the two-transaction workflow through a `ChainGateway`.
pub struct DeploymentWorkflow<G> {
    gateway: G,
    settings: WorkflowSettings,
    /// Held for the duration of a run when re-entrancy is guarded.
    in_flight: Option<Mutex<()>>,
}

impl<G: ChainGateway> DeploymentWorkflow<G> {
    pub fn new(gateway: G, settings: WorkflowSettings, guard_reentrancy: bool) -> Self {
        Self {
            gateway,
            settings,
            in_flight: guard_reentrancy.then(|| Mutex::new(())),
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run once for `session`.
    ///
    /// Returns `Ok(None)` without touching the gateway when the session has
    /// no account or no chain.
    pub async fn run(&self, session: &Session) -> WorkflowResult<Option<WorkflowOutcome>> {
        let Some((account, chain)) = session.active() else {
            tracing::debug!(
                has_account = session.account.is_some(),
                has_chain = session.chain.is_some(),
                "No active session, skipping workflow"
            );
            return Ok(None);
        };

        let _permit = match &self.in_flight {
            Some(lock) => Some(lock.try_lock().map_err(|_| WorkflowError::AlreadyRunning)?),
            None => None,
        };

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("workflow", %run_id, %account, chain = chain.0);
        let result = self.execute(run_id, account, chain).instrument(span).await;

        match &result {
            Ok(_) => metrics::record_workflow_run("completed"),
            Err(e) => {
                tracing::error!(%run_id, error = %e, "Workflow failed");
                metrics::record_workflow_run("failed");
            }
        }
        result.map(Some)
    }

    async fn execute(
        &self,
        run_id: Uuid,
        account: Address,
        chain: ChainId,
    ) -> WorkflowResult<WorkflowOutcome> {
        let salt = self.settings.salt();
        tracing::info!(step = %WorkflowStep::ComputeSalt, %salt, "Computed deployment salt");

        let contract = ContractHandle::new(self.settings.factory, chain);

        let deploy_call =
            contract.prepare_deploy_proxy(self.settings.implementation, Bytes::new(), salt);
        tracing::info!(
            step = %WorkflowStep::PrepareDeploy,
            call = ?deploy_call,
            "Prepared deploy call"
        );

        let deploy_tx = self
            .send(account, &deploy_call, WorkflowStep::SubmitDeploy)
            .await?;
        let receipt = self
            .gateway
            .wait_for_receipt(deploy_tx)
            .await
            .map_err(|e| WorkflowError::step(WorkflowStep::ConfirmDeploy, e))?;
        metrics::record_transaction_confirmed(deploy_call.kind.as_str());
        tracing::info!(
            step = %WorkflowStep::ConfirmDeploy,
            tx_hash = %receipt.tx_hash,
            block_number = ?receipt.block_number,
            logs = receipt.logs.len(),
            "Deploy transaction confirmed"
        );

        let proxy = extract_proxy_address(&receipt.logs);
        match proxy {
            Some(proxy) => tracing::info!(
                step = %WorkflowStep::DecodeProxy,
                %proxy,
                "Decoded ProxyDeployed event"
            ),
            None => tracing::warn!(
                step = %WorkflowStep::DecodeProxy,
                tx_hash = %deploy_tx,
                "No ProxyDeployed event in receipt, continuing without proxy address"
            ),
        }

        let install_handle = match self.settings.install_target {
            InstallTarget::Factory => contract,
            InstallTarget::DeployedProxy => {
                contract.at(proxy.ok_or(WorkflowError::ProxyNotFound { tx_hash: deploy_tx })?)
            }
        };
        let install_call =
            install_handle.prepare_install_module(self.settings.module, Bytes::new());
        tracing::info!(
            step = %WorkflowStep::PrepareInstall,
            call = ?install_call,
            "Prepared install call"
        );

        let install_tx = self
            .send(account, &install_call, WorkflowStep::SubmitInstall)
            .await?;
        self.gateway
            .wait_for_receipt(install_tx)
            .await
            .map_err(|e| WorkflowError::step(WorkflowStep::ConfirmInstall, e))?;
        metrics::record_transaction_confirmed(install_call.kind.as_str());
        tracing::info!(
            step = %WorkflowStep::ConfirmInstall,
            tx_hash = %install_tx,
            "Install transaction confirmed"
        );

        Ok(WorkflowOutcome {
            run_id,
            account,
            chain,
            salt,
            deploy_tx,
            proxy,
            install_target: install_handle.address,
            install_tx,
        })
    }

    async fn send(
        &self,
        account: Address,
        call: &ContractCall,
        step: WorkflowStep,
    ) -> WorkflowResult<TxHash> {
        let tx_hash = self
            .gateway
            .submit(account, call)
            .await
            .map_err(|e| WorkflowError::step(step, e))?;
        metrics::record_transaction_submitted(call.kind.as_str());
        tracing::info!(step = %step, %tx_hash, target = %call.target, "Submitted transaction");
        Ok(tx_hash)
    }
}

impl WorkflowError {
    fn step(step: WorkflowStep, source: BlockchainError) -> Self {
        WorkflowError::Step { step, source }
    }
}
