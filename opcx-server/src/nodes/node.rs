use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use opcx_types::{
    utils::validate_browse_name, AttributeId, LocalizedText, NodeClass, NodeId, QualifiedName,
    UaError, Variant,
};

use crate::{
    error::NodeError,
    nodes::filter::{AttributeFilter, AttributeFilterContext, DynAttributeFilter},
    AttributeContext,
};

/// Storage for the mutable base attributes of a node.
#[derive(Debug, Clone)]
pub(crate) struct BaseAttributes {
    pub browse_name: QualifiedName,
    pub display_name: LocalizedText,
    pub description: Option<LocalizedText>,
    pub write_mask: u32,
    pub user_write_mask: u32,
}

/// A node in the address space.
///
/// Attribute access goes through the node's filter chain: the first filter sees the
/// operation first, and an operation every filter delegates reaches the stored value.
pub struct Node {
    node_id: NodeId,
    node_class: NodeClass,
    attributes: RwLock<BaseAttributes>,
    filters: Vec<Arc<DynAttributeFilter>>,
}

impl Node {
    pub fn builder(node_id: NodeId, node_class: NodeClass) -> NodeBuilder {
        NodeBuilder::new(node_id, node_class)
    }

    pub(crate) fn id(&self) -> &NodeId {
        &self.node_id
    }

    pub(crate) fn class(&self) -> NodeClass {
        self.node_class
    }

    pub(crate) fn attributes(&self) -> RwLockReadGuard<'_, BaseAttributes> {
        self.attributes.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn attributes_mut(&self) -> RwLockWriteGuard<'_, BaseAttributes> {
        self.attributes.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The filters attribute access on this node traverses, in order.
    pub fn filters(&self) -> &[Arc<DynAttributeFilter>] {
        &self.filters
    }

    /// Get the raw value of an attribute through the filter chain.
    pub fn get_attribute(
        &self,
        context: &AttributeContext,
        attribute_id: AttributeId,
    ) -> Result<Variant, UaError> {
        AttributeFilterContext::new(self, context).get_attribute(attribute_id)
    }

    /// Set the raw value of an attribute through the filter chain.
    pub fn set_attribute<V: Into<Variant>>(
        &self,
        context: &AttributeContext,
        attribute_id: AttributeId,
        value: V,
    ) -> Result<(), UaError> {
        AttributeFilterContext::new(self, context).set_attribute(attribute_id, value.into())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("node_id", &self.node_id)
            .field("node_class", &self.node_class)
            .field("browse_name", &self.attributes().browse_name)
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// A builder for creating [Node]s.
///
/// # Examples
///
/// ```
/// use opcx_server::{filters::LoggingFilter, Node};
/// use opcx_types::{NodeClass, NodeId, QualifiedName};
///
/// let node = Node::builder(NodeId::string(2, "Boiler1"), NodeClass::Object)
///     .with_browse_name(QualifiedName::new(2, "Boiler1"))
///     .with_write_mask(0x3)
///     .with_filter(LoggingFilter::default())
///     .build()
///     .unwrap();
/// assert_eq!(node.filters().len(), 1);
/// ```
pub struct NodeBuilder {
    node_id: NodeId,
    node_class: NodeClass,
    browse_name: Option<QualifiedName>,
    display_name: Option<LocalizedText>,
    description: Option<LocalizedText>,
    write_mask: u32,
    user_write_mask: u32,
    filters: Vec<Arc<DynAttributeFilter>>,
}

impl NodeBuilder {
    pub fn new(node_id: NodeId, node_class: NodeClass) -> Self {
        Self {
            node_id,
            node_class,
            browse_name: None,
            display_name: None,
            description: None,
            write_mask: 0,
            user_write_mask: 0,
            filters: Vec::new(),
        }
    }

    pub fn with_browse_name(mut self, browse_name: QualifiedName) -> Self {
        self.browse_name = Some(browse_name);
        self
    }

    /// Defaults to the browse name.
    pub fn with_display_name<T: Into<LocalizedText>>(mut self, display_name: T) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description<T: Into<LocalizedText>>(mut self, description: T) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_write_mask(mut self, write_mask: u32) -> Self {
        self.write_mask = write_mask;
        self
    }

    pub fn with_user_write_mask(mut self, user_write_mask: u32) -> Self {
        self.user_write_mask = user_write_mask;
        self
    }

    /// Append a filter to the end of the chain.
    pub fn with_filter<F>(self, filter: F) -> Self
    where
        F: AttributeFilter + Send + Sync + 'static,
    {
        self.with_shared_filter(Arc::new(filter))
    }

    /// Append a filter that may also be installed on other nodes.
    pub fn with_shared_filter(mut self, filter: Arc<DynAttributeFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn build(self) -> Result<Node, NodeError> {
        if self.node_id.is_null() {
            return Err(NodeError::NullNodeId);
        }
        let browse_name = self.browse_name.ok_or(NodeError::MissingBrowseName)?;
        validate_browse_name(&browse_name.name).map_err(NodeError::InvalidBrowseName)?;

        let display_name = self
            .display_name
            .unwrap_or_else(|| LocalizedText::text(browse_name.name.clone()));

        Ok(Node {
            node_id: self.node_id,
            node_class: self.node_class,
            attributes: RwLock::new(BaseAttributes {
                browse_name,
                display_name,
                description: self.description,
                write_mask: self.write_mask,
                user_write_mask: self.user_write_mask,
            }),
            filters: self.filters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> NodeBuilder {
        Node::builder(NodeId::numeric(2, 10), NodeClass::Variable)
    }

    #[test]
    fn display_name_defaults_to_browse_name() {
        let node = builder()
            .with_browse_name(QualifiedName::new(2, "Pressure"))
            .build()
            .unwrap();
        assert_eq!(node.attributes().display_name, LocalizedText::text("Pressure"));
        assert_eq!(node.attributes().description, None);
    }

    #[test]
    fn invalid_nodes() {
        assert_eq!(builder().build().unwrap_err(), NodeError::MissingBrowseName);
        assert!(matches!(
            builder()
                .with_browse_name(QualifiedName::new(2, "a/b"))
                .build(),
            Err(NodeError::InvalidBrowseName(_))
        ));
        assert_eq!(
            Node::builder(NodeId::NULL, NodeClass::Object)
                .with_browse_name(QualifiedName::new(0, "x"))
                .build()
                .unwrap_err(),
            NodeError::NullNodeId
        );
    }
}
