//! An OPC UA server toolkit.
//!
//! # Feature Flags
//!
//! - `server`: Enables the [server] node model and attribute services. Enabled by default.
//! - `local-transport`: Enables the in-memory transport in [stack::local]. Disabled by default.

pub use opcx_stack as stack;
pub use opcx_types as types;

#[cfg(feature = "server")]
pub use opcx_server as server;
