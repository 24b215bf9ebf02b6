use serde::{Deserialize, Serialize};

use crate::{DateTime, StatusCode, UaError, Variant};

/// A value together with its quality and timestamps, the envelope attribute values are
/// delivered in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataValue {
    pub value: Variant,
    pub status: StatusCode,
    pub source_timestamp: Option<DateTime>,
    pub server_timestamp: Option<DateTime>,
}

impl DataValue {
    /// Wrap a value for delivery, stamped with the current server time.
    pub fn new<V: Into<Variant>>(value: V) -> Self {
        Self {
            value: value.into(),
            status: StatusCode::GOOD,
            source_timestamp: None,
            server_timestamp: Some(DateTime::now()),
        }
    }

    /// A value without any timestamps.
    pub fn value_only<V: Into<Variant>>(value: V) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// An envelope that only reports a status, e.g. one failed item of a read.
    pub fn from_status<S: Into<StatusCode>>(status: S) -> Self {
        Self {
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn source_timestamp(mut self, timestamp: DateTime) -> Self {
        self.source_timestamp = Some(timestamp);
        self
    }

    /// Unwrap the envelope into a value of type `T`.
    ///
    /// Fails with the envelope's status if it is bad, or `Bad_TypeMismatch` if the value
    /// is not a `T`.
    pub fn extract<T>(self) -> Result<T, UaError>
    where
        T: TryFrom<Variant, Error = UaError>,
    {
        if self.status.is_bad() {
            return Err(UaError::new(self.status));
        }
        T::try_from(self.value)
    }
}
