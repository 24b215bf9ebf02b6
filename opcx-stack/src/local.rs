use std::sync::Arc;

use log::debug;
use opcx_types::messages::{DynRequestMessage, RequestMessage};
use tokio::sync::mpsc;

use crate::{
    DynSecureChannel, DynStackServer, MessageSecurityMode, Outbound, SecureChannel,
    ServiceDispatcher, ServiceRequest, StackServer, StackServerConfig,
};

pub const SECURITY_POLICY_NONE: &str = "http://opcfoundation.org/UA/SecurityPolicy#None";

/// A [SecureChannel] without any transport behind it.
#[derive(Debug, Clone)]
pub struct LocalSecureChannel {
    channel_id: u32,
    security_policy_uri: String,
    security_mode: MessageSecurityMode,
}

impl LocalSecureChannel {
    pub fn new(channel_id: u32) -> Self {
        Self {
            channel_id,
            security_policy_uri: SECURITY_POLICY_NONE.into(),
            security_mode: MessageSecurityMode::None,
        }
    }

    pub fn with_security<S: Into<String>>(mut self, policy_uri: S, mode: MessageSecurityMode) -> Self {
        self.security_policy_uri = policy_uri.into();
        self.security_mode = mode;
        self
    }
}

impl SecureChannel for LocalSecureChannel {
    fn channel_id(&self) -> u32 {
        self.channel_id
    }

    fn security_policy_uri(&self) -> &str {
        &self.security_policy_uri
    }

    fn security_mode(&self) -> MessageSecurityMode {
        self.security_mode
    }
}

/// A [StackServer] that only carries configuration.
#[derive(Debug, Clone, Default)]
pub struct LocalStackServer {
    config: StackServerConfig,
}

impl LocalStackServer {
    pub fn new(config: StackServerConfig) -> Self {
        Self { config }
    }
}

impl StackServer for LocalStackServer {
    fn config(&self) -> &StackServerConfig {
        &self.config
    }
}

/// A message the [LocalTransport] wrote back for a resolved request.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub channel_id: u32,
    pub message: Outbound,
}

/// Receives what a [LocalTransport] writes.
///
/// Used to inspect responses and faults produced for submitted requests.
pub struct LocalBroker {
    pub rx_outbound: mpsc::UnboundedReceiver<OutboundMessage>,
}

/// An in-memory transport that submits requests to a [ServiceDispatcher] and writes each
/// outcome to a channel, the way a socket transport writes it to the wire.
///
/// # Examples
///
/// ```no_run
/// use opcx_stack::{local::LocalTransport, ServiceDispatcher, StackServerConfig};
/// use opcx_types::{messages::{ReadRequest, RequestHeader}, NodeId};
/// use tokio::runtime::Runtime;
///
/// let rt = Runtime::new().unwrap();
/// rt.block_on(async {
///     let (transport, mut broker) = LocalTransport::new(StackServerConfig::default());
///     let dispatcher = ServiceDispatcher::new(StackServerConfig::default());
///     let channel = transport.open_channel(1);
///
///     let read = ReadRequest {
///         request_header: RequestHeader::new(NodeId::numeric(0, 1), 7),
///         max_age: 0.0,
///         nodes_to_read: vec![],
///     };
///     transport.submit(&dispatcher, &channel, read);
///
///     // no handler registered, so this is a Bad_ServiceUnsupported fault
///     let written = broker.rx_outbound.recv().await.unwrap();
///     assert!(written.message.is_fault());
/// });
/// ```
pub struct LocalTransport {
    server: Arc<DynStackServer>,
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl LocalTransport {
    pub fn new(config: StackServerConfig) -> (Self, LocalBroker) {
        let (tx, rx_outbound) = mpsc::unbounded_channel();
        let server: Arc<DynStackServer> = Arc::new(LocalStackServer::new(config));
        (Self { server, tx }, LocalBroker { rx_outbound })
    }

    pub fn server(&self) -> &Arc<DynStackServer> {
        &self.server
    }

    pub fn open_channel(&self, channel_id: u32) -> Arc<DynSecureChannel> {
        Arc::new(LocalSecureChannel::new(channel_id))
    }

    /// Wrap `request` into a [ServiceRequest] without dispatching it.
    pub fn accept(
        &self,
        channel: &Arc<DynSecureChannel>,
        request: Arc<DynRequestMessage>,
    ) -> ServiceRequest {
        let request = ServiceRequest::new(request, self.server.clone(), channel.clone());
        self.write_when_resolved(&request);
        request
    }

    /// Accept `request` and hand it to `dispatcher`.
    pub fn submit<R>(
        &self,
        dispatcher: &ServiceDispatcher,
        channel: &Arc<DynSecureChannel>,
        request: R,
    ) -> ServiceRequest
    where
        R: RequestMessage,
    {
        let request = self.accept(channel, Arc::new(request));
        dispatcher.dispatch(request.clone());
        request
    }

    fn write_when_resolved(&self, request: &ServiceRequest) {
        let tx = self.tx.clone();
        let request = request.clone();
        tokio::spawn(async move {
            let message = request.outbound().await;
            let channel_id = request.secure_channel().channel_id();
            if tx.send(OutboundMessage { channel_id, message }).is_err() {
                debug!("Broker dropped, discarding outbound message for {request:?}");
            }
        });
    }
}
