use std::sync::Arc;

use log::info;
use opcx_stack::ServiceDispatcher;

use crate::{error::NodeError, AttributeServices, Node, NodeMap, ServerConfig, SessionRegistry};

/// An OPC UA server: the address space, active sessions and the dispatcher routing
/// service requests to them.
///
/// The Read and Write services are registered on construction. Further services can be
/// added through [UaServer::dispatcher_mut].
pub struct UaServer {
    config: ServerConfig,
    nodes: Arc<NodeMap>,
    sessions: Arc<SessionRegistry>,
    dispatcher: ServiceDispatcher,
}

impl UaServer {
    pub fn new(config: ServerConfig) -> Self {
        let nodes = Arc::new(NodeMap::new());
        let sessions = Arc::new(SessionRegistry::new());
        let mut dispatcher = ServiceDispatcher::new(config.stack.clone());
        AttributeServices::new(nodes.clone(), sessions.clone(), &config).register(&mut dispatcher);
        info!("Server created for {}", config.stack.endpoint_url);
        Self {
            config,
            nodes,
            sessions,
            dispatcher,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn nodes(&self) -> &Arc<NodeMap> {
        &self.nodes
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn dispatcher(&self) -> &ServiceDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut ServiceDispatcher {
        &mut self.dispatcher
    }

    pub fn add_node(&self, node: Node) -> Result<Arc<Node>, NodeError> {
        self.nodes.insert(node)
    }

    /// Fault the pending requests of a closed secure channel.
    pub fn channel_closed(&self, channel_id: u32) -> usize {
        self.dispatcher.channel_closed(channel_id)
    }

    /// Fault every pending request and stop serving new ones. Returns how many pending
    /// requests were faulted.
    pub fn shutdown(&self) -> usize {
        info!("Server shutting down");
        self.dispatcher.shutdown()
    }
}
