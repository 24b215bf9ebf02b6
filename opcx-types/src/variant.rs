use serde::{Deserialize, Serialize};

use crate::{DateTime, LocalizedText, NodeClass, NodeId, QualifiedName, StatusCode, UaError};

/// A raw attribute value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Empty,
    Boolean(bool),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    DateTime(DateTime),
    NodeId(Box<NodeId>),
    QualifiedName(Box<QualifiedName>),
    LocalizedText(Box<LocalizedText>),
    StatusCode(StatusCode),
    ByteString(Vec<u8>),
    NodeClass(NodeClass),
}

impl Variant {
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    /// Name of the variant's type, used in type mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Variant::Empty => "Empty",
            Variant::Boolean(_) => "Boolean",
            Variant::Int32(_) => "Int32",
            Variant::UInt32(_) => "UInt32",
            Variant::Int64(_) => "Int64",
            Variant::UInt64(_) => "UInt64",
            Variant::Double(_) => "Double",
            Variant::String(_) => "String",
            Variant::DateTime(_) => "DateTime",
            Variant::NodeId(_) => "NodeId",
            Variant::QualifiedName(_) => "QualifiedName",
            Variant::LocalizedText(_) => "LocalizedText",
            Variant::StatusCode(_) => "StatusCode",
            Variant::ByteString(_) => "ByteString",
            Variant::NodeClass(_) => "NodeClass",
        }
    }
}

fn type_mismatch(expected: &str, got: &Variant) -> UaError {
    UaError::with_message(
        StatusCode::BAD_TYPE_MISMATCH,
        format!("expected {expected}, got {}", got.type_name()),
    )
}

macro_rules! impl_variant_conversions {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Variant {
            fn from(value: $ty) -> Self {
                Variant::$variant(value)
            }
        }

        impl TryFrom<Variant> for $ty {
            type Error = UaError;

            fn try_from(value: Variant) -> Result<Self, Self::Error> {
                match value {
                    Variant::$variant(inner) => Ok(inner),
                    other => Err(type_mismatch(stringify!($variant), &other)),
                }
            }
        }
    };
    (boxed $variant:ident, $ty:ty) => {
        impl From<$ty> for Variant {
            fn from(value: $ty) -> Self {
                Variant::$variant(Box::new(value))
            }
        }

        impl TryFrom<Variant> for $ty {
            type Error = UaError;

            fn try_from(value: Variant) -> Result<Self, Self::Error> {
                match value {
                    Variant::$variant(inner) => Ok(*inner),
                    other => Err(type_mismatch(stringify!($variant), &other)),
                }
            }
        }
    };
}

impl_variant_conversions!(Boolean, bool);
impl_variant_conversions!(Int32, i32);
impl_variant_conversions!(UInt32, u32);
impl_variant_conversions!(Int64, i64);
impl_variant_conversions!(UInt64, u64);
impl_variant_conversions!(Double, f64);
impl_variant_conversions!(String, String);
impl_variant_conversions!(DateTime, DateTime);
impl_variant_conversions!(StatusCode, StatusCode);
impl_variant_conversions!(ByteString, Vec<u8>);
impl_variant_conversions!(NodeClass, NodeClass);
impl_variant_conversions!(boxed NodeId, NodeId);
impl_variant_conversions!(boxed QualifiedName, QualifiedName);
impl_variant_conversions!(boxed LocalizedText, LocalizedText);

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}
