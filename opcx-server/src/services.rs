use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use opcx_stack::{DynServiceHandler, ServiceDispatcher, ServiceHandler, ServiceRequest, ServiceResponse};
use opcx_types::{
    messages::{
        ReadRequest, ReadResponse, ReadValueId, RequestHeader, WriteRequest, WriteResponse,
        WriteValue,
    },
    DataValue, StatusCode, UaError,
};

use crate::{AttributeContext, NodeMap, ServerConfig, SessionRegistry};

/// Serves the Read and Write services from a [NodeMap].
///
/// The caller's session is looked up from the request header's authentication token and
/// every item goes through the target node's filter chain with that session as context.
/// Failures of individual items are reported in the results; only failures of the
/// request as a whole become a service fault.
pub struct AttributeServices {
    nodes: Arc<NodeMap>,
    sessions: Arc<SessionRegistry>,
    max_nodes_per_read: usize,
    max_nodes_per_write: usize,
}

impl AttributeServices {
    pub fn new(nodes: Arc<NodeMap>, sessions: Arc<SessionRegistry>, config: &ServerConfig) -> Self {
        Self {
            nodes,
            sessions,
            max_nodes_per_read: config.max_nodes_per_read,
            max_nodes_per_write: config.max_nodes_per_write,
        }
    }

    /// Register as the handler of both services.
    pub fn register(self, dispatcher: &mut ServiceDispatcher) {
        let handler: Arc<DynServiceHandler> = Arc::new(self);
        dispatcher.register_shared::<ReadRequest>(handler.clone());
        dispatcher.register_shared::<WriteRequest>(handler);
    }

    fn context(&self, header: &RequestHeader) -> Result<AttributeContext, UaError> {
        match self.sessions.get(&header.authentication_token) {
            Some(session) => Ok(AttributeContext::Session(session)),
            None => {
                warn!(
                    "No session for authentication token {}",
                    header.authentication_token
                );
                Err(UaError::new(StatusCode::BAD_SESSION_ID_INVALID))
            }
        }
    }

    fn check_operations(count: usize, max: usize) -> Result<(), UaError> {
        if count == 0 {
            return Err(UaError::new(StatusCode::BAD_NOTHING_TO_DO));
        }
        if count > max {
            return Err(UaError::with_message(
                StatusCode::BAD_TOO_MANY_OPERATIONS,
                format!("{count} operations exceed the limit of {max}"),
            ));
        }
        Ok(())
    }

    fn read_value(&self, context: &AttributeContext, item: &ReadValueId) -> DataValue {
        let Some(node) = self.nodes.get(&item.node_id) else {
            return DataValue::from_status(StatusCode::BAD_NODE_ID_UNKNOWN);
        };
        node.read_attribute(context, item.attribute_id)
            .unwrap_or_else(|e| {
                debug!("Read of {} attribute {} failed: {e}", item.node_id, item.attribute_id);
                DataValue::from_status(e.status())
            })
    }

    fn write_value(&self, context: &AttributeContext, item: &WriteValue) -> StatusCode {
        let Some(node) = self.nodes.get(&item.node_id) else {
            return StatusCode::BAD_NODE_ID_UNKNOWN;
        };
        match node.write_attribute(context, item.attribute_id, item.value.clone()) {
            Ok(()) => StatusCode::GOOD,
            Err(e) => {
                debug!("Write of {} attribute {} failed: {e}", item.node_id, item.attribute_id);
                e.status()
            }
        }
    }

    pub fn read(&self, request: &ServiceRequest, read: &ReadRequest) -> Result<ReadResponse, UaError> {
        let context = self.context(&read.request_header)?;
        Self::check_operations(read.nodes_to_read.len(), self.max_nodes_per_read)?;

        let results = read
            .nodes_to_read
            .iter()
            .map(|item| self.read_value(&context, item))
            .collect();
        Ok(ReadResponse {
            response_header: request.create_response_header(),
            results,
        })
    }

    pub fn write(&self, request: &ServiceRequest, write: &WriteRequest) -> Result<WriteResponse, UaError> {
        let context = self.context(&write.request_header)?;
        Self::check_operations(write.nodes_to_write.len(), self.max_nodes_per_write)?;

        let results = write
            .nodes_to_write
            .iter()
            .map(|item| self.write_value(&context, item))
            .collect();
        Ok(WriteResponse {
            response_header: request.create_response_header(),
            results,
        })
    }
}

#[async_trait]
impl ServiceHandler for AttributeServices {
    async fn handle(&self, request: &ServiceRequest) -> Result<ServiceResponse, UaError> {
        let message = request.request().as_any();
        if let Some(read) = message.downcast_ref::<ReadRequest>() {
            return Ok(Arc::new(self.read(request, read)?));
        }
        if let Some(write) = message.downcast_ref::<WriteRequest>() {
            return Ok(Arc::new(self.write(request, write)?));
        }
        Err(UaError::new(StatusCode::BAD_SERVICE_UNSUPPORTED))
    }
}
