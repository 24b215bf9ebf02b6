//! Part of [opcx](https://crates.io/crates/opcx), an OPC UA server toolkit.
//!
//! This library implements the service request lifecycle: every inbound request is
//! wrapped in a [ServiceRequest] that is resolved exactly once with a response or a
//! fault, and a [ServiceDispatcher] that hands requests to [ServiceHandler]s on worker
//! tasks.
//!
//! # Feature Flags
//!
//! - `local-transport`: Enables the in-memory [local::LocalTransport]. Disabled by default.
//!

mod config;
mod dispatcher;
mod request;
mod traits;
mod types;

pub use config::{ConfigError, StackServerConfig};
pub use dispatcher::{DynServiceHandler, ServiceDispatcher, ServiceHandler};
pub use request::ServiceRequest;
pub use traits::{DynSecureChannel, DynStackServer, MessageSecurityMode, SecureChannel, StackServer};
pub use types::*;

/// An in-memory transport, secure channel and stack server
///
/// Useful for writing tests where it is not appropriate to be running a real transport
#[cfg(any(feature = "local-transport", doc))]
pub mod local;
