use std::{slice, sync::Arc};

use opcx_types::{AttributeId, UaError, Variant};

use crate::{nodes::DefaultAttributeHandler, AttributeContext, Node, Session};

/// Intercepts attribute access on a [Node].
///
/// Each method receives a cursor positioned after this filter. A filter may answer on its
/// own, or hand the operation to the rest of the chain by consuming the cursor. The
/// default implementations delegate unchanged, so a filter only overrides what it
/// intercepts.
///
/// Delegating consumes the cursor, which makes delegating twice in the same step a
/// compile error:
///
/// ```compile_fail
/// use opcx_server::{AttributeFilter, AttributeFilterContext};
/// use opcx_types::{AttributeId, UaError, Variant};
///
/// struct Twice;
///
/// impl AttributeFilter for Twice {
///     fn get_attribute(
///         &self,
///         ctx: AttributeFilterContext<'_>,
///         attribute_id: AttributeId,
///     ) -> Result<Variant, UaError> {
///         let _ = ctx.get_attribute(attribute_id)?;
///         ctx.get_attribute(attribute_id)
///     }
/// }
/// ```
pub trait AttributeFilter {
    fn get_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
    ) -> Result<Variant, UaError> {
        ctx.get_attribute(attribute_id)
    }

    fn set_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), UaError> {
        ctx.set_attribute(attribute_id, value)
    }
}

pub type DynAttributeFilter = dyn AttributeFilter + Send + Sync;

/// Cursor over the remainder of a node's filter chain for one operation.
///
/// Created fresh for every get or set, so concurrent operations on the same node never
/// share a position.
pub struct AttributeFilterContext<'a> {
    node: &'a Node,
    context: &'a AttributeContext,
    remaining: slice::Iter<'a, Arc<DynAttributeFilter>>,
}

impl<'a> AttributeFilterContext<'a> {
    pub(crate) fn new(node: &'a Node, context: &'a AttributeContext) -> Self {
        Self {
            node,
            context,
            remaining: node.filters().iter(),
        }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn context(&self) -> &'a AttributeContext {
        self.context
    }

    pub fn session(&self) -> Option<&'a Arc<Session>> {
        self.context.session()
    }

    /// Hand the get to the next filter, or to the stored attributes once the chain is exhausted.
    pub fn get_attribute(mut self, attribute_id: AttributeId) -> Result<Variant, UaError> {
        match self.remaining.next() {
            Some(next) => next.get_attribute(self, attribute_id),
            None => DefaultAttributeHandler.get_attribute(self.node, attribute_id),
        }
    }

    /// Hand the set to the next filter, or to the stored attributes once the chain is exhausted.
    pub fn set_attribute(mut self, attribute_id: AttributeId, value: Variant) -> Result<(), UaError> {
        match self.remaining.next() {
            Some(next) => next.set_attribute(self, attribute_id, value),
            None => DefaultAttributeHandler.set_attribute(self.node, attribute_id, value),
        }
    }
}
