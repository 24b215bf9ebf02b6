use std::{
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::{StatusCode, UaError};

/// The class of a node. A node belongs to exactly one class for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Object = 1,
    Variable = 2,
    Method = 4,
    ObjectType = 8,
    VariableType = 16,
    ReferenceType = 32,
    DataType = 64,
    View = 128,
}

impl TryFrom<i32> for NodeClass {
    type Error = UaError;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(NodeClass::Object),
            2 => Ok(NodeClass::Variable),
            4 => Ok(NodeClass::Method),
            8 => Ok(NodeClass::ObjectType),
            16 => Ok(NodeClass::VariableType),
            32 => Ok(NodeClass::ReferenceType),
            64 => Ok(NodeClass::DataType),
            128 => Ok(NodeClass::View),
            _ => Err(UaError::with_message(
                StatusCode::BAD_TYPE_MISMATCH,
                format!("{v} is not a node class"),
            )),
        }
    }
}

/// A name qualified by the namespace it is defined in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new<S: Into<String>>(namespace_index: u16, name: S) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_index, self.name)
    }
}

/// Human readable text with an optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    pub locale: Option<String>,
    pub text: Option<String>,
}

impl LocalizedText {
    pub fn new<L: Into<String>, T: Into<String>>(locale: L, text: T) -> Self {
        Self {
            locale: Some(locale.into()),
            text: Some(text.into()),
        }
    }

    /// Text without a locale.
    pub fn text<T: Into<String>>(text: T) -> Self {
        Self {
            locale: None,
            text: Some(text.into()),
        }
    }

    pub fn is_null(&self) -> bool {
        self.locale.is_none() && self.text.is_none()
    }
}

impl From<&str> for LocalizedText {
    fn from(value: &str) -> Self {
        LocalizedText::text(value)
    }
}

/// Seconds between 1601-01-01 and the unix epoch.
const EPOCH_DELTA_SECS: u64 = 11_644_473_600;
const TICKS_PER_SEC: u64 = 10_000_000;

/// Time as 100 nanosecond ticks since 1601-01-01 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct DateTime {
    pub ticks: i64,
}

impl DateTime {
    pub const MIN: DateTime = DateTime { ticks: 0 };

    pub fn new(ticks: i64) -> Self {
        Self { ticks }
    }

    pub fn now() -> Self {
        SystemTime::now().into()
    }

    pub fn is_null(&self) -> bool {
        self.ticks == 0
    }
}

impl From<SystemTime> for DateTime {
    fn from(value: SystemTime) -> Self {
        // times before the unix epoch are clamped to it
        let since_unix = value.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        let ticks = (since_unix.as_secs() + EPOCH_DELTA_SECS) * TICKS_PER_SEC
            + since_unix.subsec_nanos() as u64 / 100;
        Self {
            ticks: ticks as i64,
        }
    }
}
