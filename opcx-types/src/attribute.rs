use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{StatusCode, UaError};

/// Identifies an attribute of a node.
///
/// Only the first seven are common to every node class; the rest belong to specific
/// node classes and are answered, if at all, by filters installed on those nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeId {
    NodeId = 1,
    NodeClass = 2,
    BrowseName = 3,
    DisplayName = 4,
    Description = 5,
    WriteMask = 6,
    UserWriteMask = 7,
    IsAbstract = 8,
    Symmetric = 9,
    InverseName = 10,
    ContainsNoLoops = 11,
    EventNotifier = 12,
    Value = 13,
    DataType = 14,
    ValueRank = 15,
    ArrayDimensions = 16,
    AccessLevel = 17,
    UserAccessLevel = 18,
    MinimumSamplingInterval = 19,
    Historizing = 20,
    Executable = 21,
    UserExecutable = 22,
    DataTypeDefinition = 23,
    RolePermissions = 24,
    UserRolePermissions = 25,
    AccessRestrictions = 26,
    AccessLevelEx = 27,
}

const ALL: [AttributeId; 27] = [
    AttributeId::NodeId,
    AttributeId::NodeClass,
    AttributeId::BrowseName,
    AttributeId::DisplayName,
    AttributeId::Description,
    AttributeId::WriteMask,
    AttributeId::UserWriteMask,
    AttributeId::IsAbstract,
    AttributeId::Symmetric,
    AttributeId::InverseName,
    AttributeId::ContainsNoLoops,
    AttributeId::EventNotifier,
    AttributeId::Value,
    AttributeId::DataType,
    AttributeId::ValueRank,
    AttributeId::ArrayDimensions,
    AttributeId::AccessLevel,
    AttributeId::UserAccessLevel,
    AttributeId::MinimumSamplingInterval,
    AttributeId::Historizing,
    AttributeId::Executable,
    AttributeId::UserExecutable,
    AttributeId::DataTypeDefinition,
    AttributeId::RolePermissions,
    AttributeId::UserRolePermissions,
    AttributeId::AccessRestrictions,
    AttributeId::AccessLevelEx,
];

impl AttributeId {
    /// The attributes every node has, in id order.
    pub const BASE: [AttributeId; 7] = [
        AttributeId::NodeId,
        AttributeId::NodeClass,
        AttributeId::BrowseName,
        AttributeId::DisplayName,
        AttributeId::Description,
        AttributeId::WriteMask,
        AttributeId::UserWriteMask,
    ];

    pub fn id(&self) -> u32 {
        *self as u32
    }

    pub fn is_base(&self) -> bool {
        self.id() <= AttributeId::UserWriteMask.id()
    }

    /// The WriteMask / UserWriteMask bit that controls writing this attribute.
    ///
    /// `Value` has no bit: its writability is governed by the access level.
    pub fn write_mask_bit(&self) -> Option<u32> {
        let bit = match self {
            AttributeId::AccessLevel => 0,
            AttributeId::ArrayDimensions => 1,
            AttributeId::BrowseName => 2,
            AttributeId::ContainsNoLoops => 3,
            AttributeId::DataType => 4,
            AttributeId::Description => 5,
            AttributeId::DisplayName => 6,
            AttributeId::EventNotifier => 7,
            AttributeId::Executable => 8,
            AttributeId::Historizing => 9,
            AttributeId::InverseName => 10,
            AttributeId::IsAbstract => 11,
            AttributeId::MinimumSamplingInterval => 12,
            AttributeId::NodeClass => 13,
            AttributeId::NodeId => 14,
            AttributeId::Symmetric => 15,
            AttributeId::UserAccessLevel => 16,
            AttributeId::UserExecutable => 17,
            AttributeId::UserWriteMask => 18,
            AttributeId::ValueRank => 19,
            AttributeId::WriteMask => 20,
            AttributeId::DataTypeDefinition => 22,
            AttributeId::RolePermissions => 23,
            AttributeId::AccessRestrictions => 24,
            AttributeId::AccessLevelEx => 25,
            AttributeId::Value | AttributeId::UserRolePermissions => return None,
        };
        Some(1 << bit)
    }
}

impl TryFrom<u32> for AttributeId {
    type Error = UaError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        ALL.iter()
            .find(|attribute| attribute.id() == value)
            .copied()
            .ok_or_else(|| {
                UaError::with_message(
                    StatusCode::BAD_ATTRIBUTE_ID_INVALID,
                    format!("unknown attribute id {value}"),
                )
            })
    }
}

impl From<AttributeId> for u32 {
    fn from(value: AttributeId) -> Self {
        value.id()
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
