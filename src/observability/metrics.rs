//! Metrics collection and exposition.
//!
//! # Metrics
//! - `deployer_transactions_submitted_total` (counter): by call kind
//! - `deployer_transactions_confirmed_total` (counter): by call kind
//! - `deployer_workflow_runs_total` (counter): by outcome
//! - `deployer_rpc_health` (gauge): 1=healthy, 0=unhealthy
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_transaction_submitted(kind: &'static str) {
    counter!("deployer_transactions_submitted_total", "kind" => kind).increment(1);
}

pub fn record_transaction_confirmed(kind: &'static str) {
    counter!("deployer_transactions_confirmed_total", "kind" => kind).increment(1);
}

pub fn record_workflow_run(outcome: &'static str) {
    counter!("deployer_workflow_runs_total", "outcome" => outcome).increment(1);
}

pub fn record_rpc_health(healthy: bool) {
    gauge!("deployer_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}
