//! Stock [AttributeFilter] implementations.

use log::{debug, log, Level};
use opcx_types::{AttributeId, StatusCode, UaError, Variant};

use crate::{AttributeFilter, AttributeFilterContext};

/// Logs every attribute operation passing through it, together with its outcome.
#[derive(Debug, Clone, Copy)]
pub struct LoggingFilter {
    level: Level,
}

impl LoggingFilter {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingFilter {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}

impl AttributeFilter for LoggingFilter {
    fn get_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
    ) -> Result<Variant, UaError> {
        let node = ctx.node();
        let internal = ctx.context().is_internal();
        let result = ctx.get_attribute(attribute_id);
        match &result {
            Ok(value) => log!(
                self.level,
                "get {attribute_id} on {} (internal={internal}): {value:?}",
                node.id()
            ),
            Err(e) => log!(
                self.level,
                "get {attribute_id} on {} (internal={internal}) failed: {e}",
                node.id()
            ),
        }
        result
    }

    fn set_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), UaError> {
        let node = ctx.node();
        let internal = ctx.context().is_internal();
        log!(
            self.level,
            "set {attribute_id} on {} (internal={internal}) to {value:?}",
            node.id()
        );
        let result = ctx.set_attribute(attribute_id, value);
        if let Err(e) = &result {
            log!(self.level, "set {attribute_id} on {} failed: {e}", node.id());
        }
        result
    }
}

/// Rejects writes by sessions whose UserWriteMask does not grant the written attribute.
///
/// Internal operations always pass. Attributes without a write mask bit, such as
/// `Value`, are left to other filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControlFilter;

impl AttributeFilter for AccessControlFilter {
    fn set_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), UaError> {
        if let (Some(session), Some(bit)) = (ctx.session(), attribute_id.write_mask_bit()) {
            let node = ctx.node();
            let user_write_mask = node.user_write_mask(ctx.context())?;
            if user_write_mask & bit == 0 {
                debug!(
                    "Session {} denied writing {attribute_id} on {}",
                    session.session_id(),
                    node.id()
                );
                return Err(UaError::new(StatusCode::BAD_USER_ACCESS_DENIED));
            }
        }
        ctx.set_attribute(attribute_id, value)
    }
}

/// Answers gets of one attribute with a fixed value and rejects writes to it.
///
/// Other attributes pass through untouched.
#[derive(Debug, Clone)]
pub struct AttributeOverride {
    attribute_id: AttributeId,
    value: Variant,
}

impl AttributeOverride {
    pub fn new<V: Into<Variant>>(attribute_id: AttributeId, value: V) -> Self {
        Self {
            attribute_id,
            value: value.into(),
        }
    }
}

impl AttributeFilter for AttributeOverride {
    fn get_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
    ) -> Result<Variant, UaError> {
        if attribute_id == self.attribute_id {
            return Ok(self.value.clone());
        }
        ctx.get_attribute(attribute_id)
    }

    fn set_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), UaError> {
        if attribute_id == self.attribute_id {
            return Err(UaError::with_message(
                StatusCode::BAD_NOT_WRITABLE,
                format!("{attribute_id} is overridden"),
            ));
        }
        ctx.set_attribute(attribute_id, value)
    }
}
