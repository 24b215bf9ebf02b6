use std::error::Error;

use thiserror::Error;

use crate::StatusCode;

/// A protocol-domain error carrying the [StatusCode] that describes it.
///
/// Raised by attribute filters, the default attribute handler and service handlers.
/// Cloneable so that every observer of a failed service request sees the same error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct UaError {
    status: StatusCode,
    message: Option<String>,
}

impl UaError {
    pub fn new<S: Into<StatusCode>>(status: S) -> Self {
        Self {
            status: status.into(),
            message: None,
        }
    }

    pub fn with_message<S: Into<StatusCode>, M: Into<String>>(status: S, message: M) -> Self {
        Self {
            status: status.into(),
            message: Some(message.into()),
        }
    }

    /// Wrap an error that is not a protocol-domain error as `Bad_UnexpectedError`.
    pub fn unexpected<E: Error + ?Sized>(err: &E) -> Self {
        Self::with_message(StatusCode::BAD_UNEXPECTED_ERROR, err.to_string())
    }

    /// Recover the [UaError] behind a type erased error, or wrap it with [UaError::unexpected].
    pub fn from_dyn(err: &(dyn Error + 'static)) -> Self {
        match err.downcast_ref::<UaError>() {
            Some(ua) => ua.clone(),
            None => Self::unexpected(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<StatusCode> for UaError {
    fn from(value: StatusCode) -> Self {
        UaError::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct OtherError;

    #[test]
    fn from_dyn_keeps_domain_errors() {
        let err = UaError::new(StatusCode::BAD_USER_ACCESS_DENIED);
        let boxed: Box<dyn Error + Send + Sync> = Box::new(err.clone());
        assert_eq!(UaError::from_dyn(boxed.as_ref()), err);
    }

    #[test]
    fn from_dyn_wraps_other_errors() {
        let err = UaError::from_dyn(&OtherError);
        assert_eq!(err.status(), StatusCode::BAD_UNEXPECTED_ERROR);
        assert_eq!(err.message(), Some("disk on fire"));
    }

    #[test]
    fn display() {
        assert_eq!(UaError::new(StatusCode::BAD_TIMEOUT).to_string(), "Bad_Timeout");
        assert_eq!(
            UaError::with_message(StatusCode::BAD_TIMEOUT, "slow").to_string(),
            "Bad_Timeout: slow"
        );
    }
}
