mod attributes;
mod default;
mod filter;
pub mod filters;
mod node;

pub use default::DefaultAttributeHandler;
pub use filter::{AttributeFilter, AttributeFilterContext, DynAttributeFilter};
pub use node::{Node, NodeBuilder};
