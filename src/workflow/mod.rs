//! Deployment-and-install workflow.
//!
//! # Data Flow
//! ```text
//! Session { account, chain }      (absent either → no-op)
//!     → salt.rs (constant salt)
//!     → deploy proxy call  → gateway.submit → gateway.wait_for_receipt
//!     → ProxyDeployed log  → proxy address (may be absent)
//!     → install module call → gateway.submit → gateway.wait_for_receipt
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: the install call is built only after the deploy
//!   receipt is observed
//! - Any gateway error aborts the run; nothing is retried
//! - A missing `ProxyDeployed` event is logged, not an error, unless the
//!   install call is configured to target the deployed proxy
//! - One run at a time per workflow instance when the guard is enabled

pub mod gateway;
pub mod pipeline;
pub mod salt;

use std::fmt;

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::types::BlockchainError;

pub use gateway::ChainGateway;
pub use pipeline::{DeploymentWorkflow, WorkflowOutcome, WorkflowSettings};
pub use salt::compute_salt;

/// The ordered steps of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    ComputeSalt,
    PrepareDeploy,
    SubmitDeploy,
    ConfirmDeploy,
    DecodeProxy,
    PrepareInstall,
    SubmitInstall,
    ConfirmInstall,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStep::ComputeSalt => "compute_salt",
            WorkflowStep::PrepareDeploy => "prepare_deploy",
            WorkflowStep::SubmitDeploy => "submit_deploy",
            WorkflowStep::ConfirmDeploy => "confirm_deploy",
            WorkflowStep::DecodeProxy => "decode_proxy",
            WorkflowStep::PrepareInstall => "prepare_install",
            WorkflowStep::SubmitInstall => "submit_install",
            WorkflowStep::ConfirmInstall => "confirm_install",
        };
        f.write_str(name)
    }
}

/// Errors that end a workflow run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A chain interaction failed.
    #[error("{step} failed: {source}")]
    Step {
        step: WorkflowStep,
        #[source]
        source: BlockchainError,
    },

    /// The install call targets the deployed proxy but none was decoded.
    #[error("No ProxyDeployed event in receipt of {tx_hash}")]
    ProxyNotFound { tx_hash: TxHash },

    /// Another run on this workflow has not finished.
    #[error("Workflow already running")]
    AlreadyRunning,

    /// Settings could not be resolved.
    #[error("Invalid workflow configuration: {0}")]
    Config(String),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_display() {
        let err = WorkflowError::Step {
            step: WorkflowStep::ConfirmDeploy,
            source: BlockchainError::Reverted(TxHash::ZERO),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("confirm_deploy failed: Transaction reverted"));
    }

    #[test]
    fn test_already_running_display() {
        assert_eq!(WorkflowError::AlreadyRunning.to_string(), "Workflow already running");
    }
}
