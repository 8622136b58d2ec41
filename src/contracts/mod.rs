//! Proxy factory contract surface.
//!
//! # Data Flow
//! ```text
//! ContractHandle { factory address, chain }
//!     → call.rs (ContractCall descriptors: deploy proxy, install module)
//!     → gateway submits, receipt comes back
//!     → events.rs (ProxyDeployed → proxy address)
//! ```

pub mod abi;
pub mod call;
pub mod events;

pub use abi::ProxyDeployed;
pub use call::{CallKind, ContractCall, ContractHandle, Mutability};
pub use events::{decode_proxy_deployed, extract_proxy_address};
