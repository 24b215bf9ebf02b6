use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a [StatusCode], taken from its two most significant bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Good,
    Uncertain,
    Bad,
}

/// A numeric OPC UA result code.
///
/// The full taxonomy is owned externally; codes this crate does not know about are
/// carried unchanged and only lack a symbolic name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u32);

const SEVERITY_MASK: u32 = 0xC000_0000;
const SEVERITY_UNCERTAIN: u32 = 0x4000_0000;
const SEVERITY_BAD: u32 = 0x8000_0000;

macro_rules! status_codes {
    ($($konst:ident = $value:literal => $name:literal,)*) => {
        impl StatusCode {
            $(pub const $konst: StatusCode = StatusCode($value);)*

            /// Symbolic name of the code, if it is one of the codes known to this crate.
            pub fn name(&self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($name),)*
                    _ => None,
                }
            }
        }
    };
}

status_codes! {
    GOOD = 0x0000_0000 => "Good",
    UNCERTAIN = 0x4000_0000 => "Uncertain",
    BAD = 0x8000_0000 => "Bad",
    BAD_UNEXPECTED_ERROR = 0x8001_0000 => "Bad_UnexpectedError",
    BAD_INTERNAL_ERROR = 0x8002_0000 => "Bad_InternalError",
    BAD_TIMEOUT = 0x800A_0000 => "Bad_Timeout",
    BAD_SERVICE_UNSUPPORTED = 0x800B_0000 => "Bad_ServiceUnsupported",
    BAD_SHUTDOWN = 0x800C_0000 => "Bad_Shutdown",
    BAD_NOTHING_TO_DO = 0x800F_0000 => "Bad_NothingToDo",
    BAD_TOO_MANY_OPERATIONS = 0x8010_0000 => "Bad_TooManyOperations",
    BAD_USER_ACCESS_DENIED = 0x801F_0000 => "Bad_UserAccessDenied",
    BAD_SESSION_ID_INVALID = 0x8025_0000 => "Bad_SessionIdInvalid",
    BAD_SESSION_CLOSED = 0x8026_0000 => "Bad_SessionClosed",
    BAD_NODE_ID_UNKNOWN = 0x8034_0000 => "Bad_NodeIdUnknown",
    BAD_ATTRIBUTE_ID_INVALID = 0x8035_0000 => "Bad_AttributeIdInvalid",
    BAD_NOT_WRITABLE = 0x803B_0000 => "Bad_NotWritable",
    BAD_NOT_SUPPORTED = 0x803D_0000 => "Bad_NotSupported",
    BAD_BROWSE_NAME_INVALID = 0x8060_0000 => "Bad_BrowseNameInvalid",
    BAD_TYPE_MISMATCH = 0x8074_0000 => "Bad_TypeMismatch",
    BAD_SECURE_CHANNEL_CLOSED = 0x8086_0000 => "Bad_SecureChannelClosed",
}

impl StatusCode {
    pub fn severity(&self) -> Severity {
        match self.0 & SEVERITY_MASK {
            0 => Severity::Good,
            SEVERITY_UNCERTAIN => Severity::Uncertain,
            _ => Severity::Bad,
        }
    }

    pub fn is_good(&self) -> bool {
        self.severity() == Severity::Good
    }

    pub fn is_uncertain(&self) -> bool {
        self.severity() == Severity::Uncertain
    }

    pub fn is_bad(&self) -> bool {
        self.0 & SEVERITY_BAD != 0
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::GOOD
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        StatusCode(value)
    }
}

impl From<StatusCode> for u32 {
    fn from(value: StatusCode) -> Self {
        value.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{:#010X}", self.0),
        }
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "StatusCode({name}, {:#010X})", self.0),
            None => write!(f, "StatusCode({:#010X})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_from_high_bits() {
        assert_eq!(StatusCode::GOOD.severity(), Severity::Good);
        assert_eq!(StatusCode::UNCERTAIN.severity(), Severity::Uncertain);
        assert_eq!(StatusCode::BAD_ATTRIBUTE_ID_INVALID.severity(), Severity::Bad);
        assert!(StatusCode(0xC000_0000).is_bad());
        assert!(!StatusCode(0x4000_0001).is_bad());
        assert!(StatusCode(0x4000_0001).is_uncertain());
    }

    #[test]
    fn display_known_and_unknown() {
        assert_eq!(StatusCode::BAD_ATTRIBUTE_ID_INVALID.to_string(), "Bad_AttributeIdInvalid");
        assert_eq!(StatusCode(0x80AB_0000).to_string(), "0x80AB0000");
        assert_eq!(StatusCode::from(0x8035_0000u32), StatusCode::BAD_ATTRIBUTE_ID_INVALID);
    }
}
