//! Part of [opcx](https://crates.io/crates/opcx), an OPC UA server toolkit.
//!
//! This library provides the server side node model. Every [Node] routes attribute
//! access through an ordered chain of [AttributeFilter]s before reaching the stored
//! attribute values, and [AttributeServices] serves the Read and Write services over a
//! [NodeMap] on top of the `opcx-stack` service dispatcher.
//!
//! # Examples
//!
//! ```
//! use opcx_server::{filters::AttributeOverride, AttributeContext, Node};
//! use opcx_types::{AttributeId, LocalizedText, NodeClass, NodeId, QualifiedName};
//!
//! let node = Node::builder(NodeId::numeric(2, 1001), NodeClass::Variable)
//!     .with_browse_name(QualifiedName::new(2, "Temperature"))
//!     .with_filter(AttributeOverride::new(AttributeId::DisplayName, LocalizedText::text("Temp")))
//!     .build()
//!     .unwrap();
//!
//! let display_name = node.display_name(&AttributeContext::Internal).unwrap();
//! assert_eq!(display_name, LocalizedText::text("Temp"));
//! ```

mod address_space;
mod config;
mod context;
mod error;
mod nodes;
mod server;
mod services;
mod session;

pub use address_space::NodeMap;
pub use config::ServerConfig;
pub use context::AttributeContext;
pub use error::NodeError;
pub use nodes::{
    filters, AttributeFilter, AttributeFilterContext, DefaultAttributeHandler, DynAttributeFilter,
    Node, NodeBuilder,
};
pub use server::UaServer;
pub use services::AttributeServices;
pub use session::{Session, SessionRegistry, UserIdentity};
