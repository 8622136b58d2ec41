//! Proxy deployment and module installation over JSON-RPC.

pub mod blockchain;
pub mod config;
pub mod contracts;
pub mod observability;
pub mod resilience;
pub mod session;
pub mod workflow;

pub use config::DeployerConfig;
pub use session::{Session, SessionProvider};
pub use workflow::{DeploymentWorkflow, WorkflowOutcome};
