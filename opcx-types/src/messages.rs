use std::any::Any;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::{DataValue, DateTime, NodeId, StatusCode};

/// Diagnostics attached to a response. Diagnostics are not produced by this crate, so
/// headers always carry the empty value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    pub symbolic_id: Option<i32>,
    pub namespace_uri: Option<i32>,
    pub localized_text: Option<i32>,
    pub additional_info: Option<String>,
    pub inner_status_code: Option<StatusCode>,
}

/// An encoded structure of a type the receiver may not know about.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtensionObject {
    #[default]
    Null,
    Binary { type_id: NodeId, body: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestHeader {
    pub authentication_token: NodeId,
    pub timestamp: DateTime,
    /// Client assigned handle echoed back in the response
    pub request_handle: u32,
    pub return_diagnostics: u32,
    pub audit_entry_id: Option<String>,
    /// Milliseconds the client is willing to wait, zero for no hint
    pub timeout_hint: u32,
}

impl RequestHeader {
    pub fn new(authentication_token: NodeId, request_handle: u32) -> Self {
        Self {
            authentication_token,
            timestamp: DateTime::now(),
            request_handle,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub timestamp: DateTime,
    pub request_handle: u32,
    pub service_result: StatusCode,
    pub service_diagnostics: DiagnosticInfo,
    pub string_table: Vec<String>,
    pub additional_header: ExtensionObject,
}

impl ResponseHeader {
    /// A header correlated to `request_handle`, stamped now, with empty diagnostics.
    pub fn new(request_handle: u32, service_result: StatusCode) -> Self {
        Self {
            timestamp: DateTime::now(),
            request_handle,
            service_result,
            service_diagnostics: DiagnosticInfo::default(),
            string_table: Vec::new(),
            additional_header: ExtensionObject::Null,
        }
    }
}

/// A message sent by a client to invoke a service.
pub trait RequestMessage: Debug + Send + Sync + 'static {
    fn request_header(&self) -> &RequestHeader;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

/// A message sent by the server to complete a service invocation.
pub trait ResponseMessage: Debug + Send + Sync + 'static {
    fn response_header(&self) -> &ResponseHeader;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

pub type DynRequestMessage = dyn RequestMessage;
pub type DynResponseMessage = dyn ResponseMessage;

macro_rules! impl_request_message {
    ($ty:ident) => {
        impl RequestMessage for $ty {
            fn request_header(&self) -> &RequestHeader {
                &self.request_header
            }
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

macro_rules! impl_response_message {
    ($ty:ident) => {
        impl ResponseMessage for $ty {
            fn response_header(&self) -> &ResponseHeader {
                &self.response_header
            }
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

/// The response sent in place of a service's own response when the whole invocation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFault {
    pub response_header: ResponseHeader,
}

impl ServiceFault {
    pub fn new(response_header: ResponseHeader) -> Self {
        Self { response_header }
    }

    pub fn status(&self) -> StatusCode {
        self.response_header.service_result
    }
}

impl_response_message!(ServiceFault);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadValueId {
    pub node_id: NodeId,
    /// Raw attribute id, validated by the server
    pub attribute_id: u32,
}

impl ReadValueId {
    pub fn new<A: Into<u32>>(node_id: NodeId, attribute_id: A) -> Self {
        Self {
            node_id,
            attribute_id: attribute_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub request_header: RequestHeader,
    pub max_age: f64,
    pub nodes_to_read: Vec<ReadValueId>,
}

impl_request_message!(ReadRequest);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<DataValue>,
}

impl_response_message!(ReadResponse);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteValue {
    pub node_id: NodeId,
    pub attribute_id: u32,
    pub value: DataValue,
}

impl WriteValue {
    pub fn new<A: Into<u32>>(node_id: NodeId, attribute_id: A, value: DataValue) -> Self {
        Self {
            node_id,
            attribute_id: attribute_id.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteRequest {
    pub request_header: RequestHeader,
    pub nodes_to_write: Vec<WriteValue>,
}

impl_request_message!(WriteRequest);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<StatusCode>,
}

impl_response_message!(WriteResponse);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_header_reserved_fields_are_empty() {
        let header = ResponseHeader::new(0, StatusCode::GOOD);
        assert_eq!(header.service_diagnostics, DiagnosticInfo::default());
        assert!(header.string_table.is_empty());
        assert_eq!(header.additional_header, ExtensionObject::Null);

        let json = serde_json::to_value(&header).unwrap();
        for field in ["service_diagnostics", "string_table", "additional_header"] {
            assert!(json.get(field).is_some(), "{field} missing from encoded header");
        }
    }

    #[test]
    fn message_type_names() {
        let fault = ServiceFault::new(ResponseHeader::new(1, StatusCode::BAD));
        assert_eq!(ResponseMessage::type_name(&fault), "ServiceFault");
        let read = ReadRequest {
            request_header: RequestHeader::default(),
            max_age: 0.0,
            nodes_to_read: vec![],
        };
        assert_eq!(RequestMessage::type_name(&read), "ReadRequest");
        assert!(read.as_any().downcast_ref::<ReadRequest>().is_some());
    }
}
