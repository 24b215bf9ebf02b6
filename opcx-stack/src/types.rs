use std::sync::Arc;

use opcx_types::{
    messages::{DynResponseMessage, ResponseMessage, ServiceFault},
    StatusCode, UaError,
};
use thiserror::Error;

/// A response produced for a service request, shared between every observer.
pub type ServiceResponse = Arc<DynResponseMessage>;

/// The terminal outcome of a service request.
///
/// `Err` is a service fault. It is kept distinct from a response so the transport can
/// choose a different wire representation for it.
pub type ServiceResult = Result<ServiceResponse, UaError>;

/// Returned when a resolution is attempted on an already resolved request.
///
/// The first outcome always stands; the rejected outcome is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Service request already resolved with a {0}")]
    AlreadyResponded(&'static str),
    #[error("Service request already resolved with fault {0}")]
    AlreadyFaulted(StatusCode),
}

impl ResolveError {
    pub(crate) fn from_existing(existing: &ServiceResult) -> Self {
        match existing {
            Ok(response) => ResolveError::AlreadyResponded(response.type_name()),
            Err(err) => ResolveError::AlreadyFaulted(err.status()),
        }
    }
}

/// What the transport writes back for a resolved request.
#[derive(Debug, Clone)]
pub enum Outbound {
    Response(ServiceResponse),
    Fault(ServiceFault),
}

impl Outbound {
    pub fn request_handle(&self) -> u32 {
        match self {
            Outbound::Response(response) => response.response_header().request_handle,
            Outbound::Fault(fault) => fault.response_header.request_handle,
        }
    }

    pub fn service_result(&self) -> StatusCode {
        match self {
            Outbound::Response(response) => response.response_header().service_result,
            Outbound::Fault(fault) => fault.status(),
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Outbound::Fault(_))
    }
}
