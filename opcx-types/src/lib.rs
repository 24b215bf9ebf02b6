//! Part of [opcx](https://crates.io/crates/opcx), an OPC UA server toolkit.
//!
//! This library defines the shared vocabulary used by the stack and the server: status
//! codes, the protocol-domain error type, builtin types, attribute ids and the service
//! messages the server understands.

mod attribute;
mod builtin;
mod data_value;
mod error;
mod node_id;
mod status;
mod variant;

pub mod messages;
pub mod utils;

pub use attribute::AttributeId;
pub use builtin::*;
pub use data_value::DataValue;
pub use error::UaError;
pub use node_id::{Identifier, NodeId};
pub use status::{Severity, StatusCode};
pub use variant::Variant;
