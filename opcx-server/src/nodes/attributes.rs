use opcx_types::{
    AttributeId, DataValue, LocalizedText, NodeClass, NodeId, QualifiedName, StatusCode, UaError,
    Variant,
};

use crate::{AttributeContext, Node};

/// Enveloped and typed attribute access.
///
/// Every method here goes through the filter chain. The typed getters fail with
/// `Bad_TypeMismatch` when a filter answers with a value of the wrong type.
impl Node {
    /// Read an attribute by its numeric id, wrapped in a [DataValue] stamped with the
    /// server time.
    pub fn read_attribute(
        &self,
        context: &AttributeContext,
        attribute_id: u32,
    ) -> Result<DataValue, UaError> {
        let attribute_id = AttributeId::try_from(attribute_id)?;
        if attribute_id.is_base() {
            return self.read_base_attribute(context, attribute_id);
        }
        self.get_attribute(context, attribute_id).map(DataValue::new)
    }

    /// Write an attribute by its numeric id.
    ///
    /// Base attributes are unwrapped to their expected type before entering the chain.
    /// An envelope with a bad status is rejected with that status.
    pub fn write_attribute(
        &self,
        context: &AttributeContext,
        attribute_id: u32,
        value: DataValue,
    ) -> Result<(), UaError> {
        let attribute_id = AttributeId::try_from(attribute_id)?;
        if attribute_id.is_base() {
            return self.write_base_attribute(context, attribute_id, value);
        }
        if value.status.is_bad() {
            return Err(UaError::new(value.status));
        }
        self.set_attribute(context, attribute_id, value.value)
    }

    /// Read one of the base attributes through its typed getter.
    pub fn read_base_attribute(
        &self,
        context: &AttributeContext,
        attribute_id: AttributeId,
    ) -> Result<DataValue, UaError> {
        let value: Variant = match attribute_id {
            AttributeId::NodeId => self.node_id(context)?.into(),
            AttributeId::NodeClass => self.node_class(context)?.into(),
            AttributeId::BrowseName => self.browse_name(context)?.into(),
            AttributeId::DisplayName => self.display_name(context)?.into(),
            AttributeId::Description => self
                .description(context)?
                .map_or(Variant::Empty, Variant::from),
            AttributeId::WriteMask => self.write_mask(context)?.into(),
            AttributeId::UserWriteMask => self.user_write_mask(context)?.into(),
            other => return Err(not_base(other)),
        };
        Ok(DataValue::new(value))
    }

    /// Unwrap `value` to the attribute's type and write it through the typed setter.
    pub fn write_base_attribute(
        &self,
        context: &AttributeContext,
        attribute_id: AttributeId,
        value: DataValue,
    ) -> Result<(), UaError> {
        match attribute_id {
            AttributeId::NodeId => self.set_node_id(context, value.extract()?),
            AttributeId::NodeClass => self.set_node_class(context, value.extract()?),
            AttributeId::BrowseName => self.set_browse_name(context, value.extract()?),
            AttributeId::DisplayName => self.set_display_name(context, value.extract()?),
            AttributeId::Description => {
                if value.status.is_bad() {
                    return Err(UaError::new(value.status));
                }
                match value.value {
                    Variant::Empty => self.set_description(context, None),
                    other => self.set_description(context, Some(LocalizedText::try_from(other)?)),
                }
            }
            AttributeId::WriteMask => self.set_write_mask(context, value.extract()?),
            AttributeId::UserWriteMask => self.set_user_write_mask(context, value.extract()?),
            other => Err(not_base(other)),
        }
    }

    pub fn node_id(&self, context: &AttributeContext) -> Result<NodeId, UaError> {
        self.get_attribute(context, AttributeId::NodeId)?.try_into()
    }

    pub fn node_class(&self, context: &AttributeContext) -> Result<NodeClass, UaError> {
        self.get_attribute(context, AttributeId::NodeClass)?.try_into()
    }

    pub fn browse_name(&self, context: &AttributeContext) -> Result<QualifiedName, UaError> {
        self.get_attribute(context, AttributeId::BrowseName)?.try_into()
    }

    pub fn display_name(&self, context: &AttributeContext) -> Result<LocalizedText, UaError> {
        self.get_attribute(context, AttributeId::DisplayName)?.try_into()
    }

    /// `None` when the node has no description.
    pub fn description(&self, context: &AttributeContext) -> Result<Option<LocalizedText>, UaError> {
        match self.get_attribute(context, AttributeId::Description)? {
            Variant::Empty => Ok(None),
            other => LocalizedText::try_from(other).map(Some),
        }
    }

    pub fn write_mask(&self, context: &AttributeContext) -> Result<u32, UaError> {
        self.get_attribute(context, AttributeId::WriteMask)?.try_into()
    }

    pub fn user_write_mask(&self, context: &AttributeContext) -> Result<u32, UaError> {
        self.get_attribute(context, AttributeId::UserWriteMask)?.try_into()
    }

    /// Always rejected by the stored attributes unless a filter intercepts it.
    pub fn set_node_id(&self, context: &AttributeContext, node_id: NodeId) -> Result<(), UaError> {
        self.set_attribute(context, AttributeId::NodeId, node_id)
    }

    /// Always rejected by the stored attributes unless a filter intercepts it.
    pub fn set_node_class(
        &self,
        context: &AttributeContext,
        node_class: NodeClass,
    ) -> Result<(), UaError> {
        self.set_attribute(context, AttributeId::NodeClass, node_class)
    }

    pub fn set_browse_name(
        &self,
        context: &AttributeContext,
        browse_name: QualifiedName,
    ) -> Result<(), UaError> {
        self.set_attribute(context, AttributeId::BrowseName, browse_name)
    }

    pub fn set_display_name(
        &self,
        context: &AttributeContext,
        display_name: LocalizedText,
    ) -> Result<(), UaError> {
        self.set_attribute(context, AttributeId::DisplayName, display_name)
    }

    pub fn set_description(
        &self,
        context: &AttributeContext,
        description: Option<LocalizedText>,
    ) -> Result<(), UaError> {
        let value = description.map_or(Variant::Empty, Variant::from);
        self.set_attribute(context, AttributeId::Description, value)
    }

    pub fn set_write_mask(&self, context: &AttributeContext, write_mask: u32) -> Result<(), UaError> {
        self.set_attribute(context, AttributeId::WriteMask, write_mask)
    }

    pub fn set_user_write_mask(
        &self,
        context: &AttributeContext,
        user_write_mask: u32,
    ) -> Result<(), UaError> {
        self.set_attribute(context, AttributeId::UserWriteMask, user_write_mask)
    }
}

fn not_base(attribute_id: AttributeId) -> UaError {
    UaError::with_message(
        StatusCode::BAD_ATTRIBUTE_ID_INVALID,
        format!("{attribute_id} is not a base attribute"),
    )
}
