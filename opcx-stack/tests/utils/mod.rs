#![allow(dead_code)]

use std::sync::Arc;

use opcx_stack::{
    DynSecureChannel, DynStackServer, MessageSecurityMode, SecureChannel, ServiceRequest,
    StackServer, StackServerConfig,
};
use opcx_types::{
    messages::{ReadRequest, ReadValueId, RequestHeader},
    AttributeId, NodeId,
};

pub struct TestChannel(pub u32);

impl SecureChannel for TestChannel {
    fn channel_id(&self) -> u32 {
        self.0
    }

    fn security_policy_uri(&self) -> &str {
        "http://opcfoundation.org/UA/SecurityPolicy#None"
    }

    fn security_mode(&self) -> MessageSecurityMode {
        MessageSecurityMode::None
    }
}

pub struct TestServer(pub StackServerConfig);

impl StackServer for TestServer {
    fn config(&self) -> &StackServerConfig {
        &self.0
    }
}

pub fn read_request(request_handle: u32, nodes: usize) -> ReadRequest {
    ReadRequest {
        request_header: RequestHeader::new(NodeId::numeric(0, 1), request_handle),
        max_age: 0.0,
        nodes_to_read: (0..nodes)
            .map(|i| ReadValueId::new(NodeId::numeric(1, i as u32), AttributeId::DisplayName))
            .collect(),
    }
}

pub fn service_request_on(channel_id: u32, request: ReadRequest) -> ServiceRequest {
    let server: Arc<DynStackServer> = Arc::new(TestServer(StackServerConfig::default()));
    let channel: Arc<DynSecureChannel> = Arc::new(TestChannel(channel_id));
    ServiceRequest::new(Arc::new(request), server, channel)
}

pub fn service_request(request_handle: u32) -> ServiceRequest {
    service_request_on(1, read_request(request_handle, 0))
}
