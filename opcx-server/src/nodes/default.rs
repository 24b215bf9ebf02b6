use log::trace;
use opcx_types::{
    utils::validate_browse_name, AttributeId, LocalizedText, QualifiedName, StatusCode, UaError,
    Variant,
};

use crate::Node;

fn invalid_attribute(attribute_id: AttributeId) -> UaError {
    UaError::with_message(
        StatusCode::BAD_ATTRIBUTE_ID_INVALID,
        format!("{attribute_id} is not a base attribute"),
    )
}

/// Terminal step of every filter chain: reads and writes the attributes stored on the node.
///
/// Only the base attributes are handled here. Anything else fails with
/// `Bad_AttributeIdInvalid`; node classes with more attributes serve them from filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAttributeHandler;

impl DefaultAttributeHandler {
    pub fn get_attribute(&self, node: &Node, attribute_id: AttributeId) -> Result<Variant, UaError> {
        let attributes = node.attributes();
        let value: Variant = match attribute_id {
            AttributeId::NodeId => node.id().clone().into(),
            AttributeId::NodeClass => node.class().into(),
            AttributeId::BrowseName => attributes.browse_name.clone().into(),
            AttributeId::DisplayName => attributes.display_name.clone().into(),
            AttributeId::Description => attributes
                .description
                .clone()
                .map_or(Variant::Empty, Variant::from),
            AttributeId::WriteMask => attributes.write_mask.into(),
            AttributeId::UserWriteMask => attributes.user_write_mask.into(),
            other => return Err(invalid_attribute(other)),
        };
        Ok(value)
    }

    /// Store `value`, which must already hold the attribute's type.
    ///
    /// `NodeId` and `NodeClass` are fixed for the node's lifetime and fail with
    /// `Bad_NotWritable`. Browse names follow the same rules as at construction and fail
    /// with `Bad_BrowseNameInvalid`. An empty value clears the description.
    pub fn set_attribute(
        &self,
        node: &Node,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), UaError> {
        if !attribute_id.is_base() {
            return Err(invalid_attribute(attribute_id));
        }
        if matches!(attribute_id, AttributeId::NodeId | AttributeId::NodeClass) {
            return Err(UaError::with_message(
                StatusCode::BAD_NOT_WRITABLE,
                format!("{attribute_id} cannot change"),
            ));
        }

        // convert before locking so a mismatch leaves the node untouched
        match attribute_id {
            AttributeId::BrowseName => {
                let browse_name = QualifiedName::try_from(value)?;
                validate_browse_name(&browse_name.name).map_err(|e| {
                    UaError::with_message(StatusCode::BAD_BROWSE_NAME_INVALID, e)
                })?;
                node.attributes_mut().browse_name = browse_name;
            }
            AttributeId::DisplayName => {
                let display_name = LocalizedText::try_from(value)?;
                node.attributes_mut().display_name = display_name;
            }
            AttributeId::Description => {
                let description = match value {
                    Variant::Empty => None,
                    value => Some(LocalizedText::try_from(value)?),
                };
                node.attributes_mut().description = description;
            }
            AttributeId::WriteMask => {
                let write_mask = u32::try_from(value)?;
                node.attributes_mut().write_mask = write_mask;
            }
            AttributeId::UserWriteMask => {
                let user_write_mask = u32::try_from(value)?;
                node.attributes_mut().user_write_mask = user_write_mask;
            }
            other => return Err(invalid_attribute(other)),
        }
        trace!("Set {attribute_id} on {}", node.id());
        Ok(())
    }
}
