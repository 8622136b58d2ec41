//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! workflow / blockchain
//!     → logging.rs (structured log events, one span per workflow run)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;
