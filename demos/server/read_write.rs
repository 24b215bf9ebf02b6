use log::{info, LevelFilter};
use opcx::server::{
    filters::{AccessControlFilter, LoggingFilter},
    Node, ServerConfig, Session, UaServer, UserIdentity,
};
use opcx::stack::{local::LocalTransport, StackServerConfig};
use opcx::types::{
    messages::{ReadRequest, ReadValueId, RequestHeader, WriteRequest, WriteValue},
    AttributeId, DataValue, LocalizedText, NodeClass, NodeId, QualifiedName,
};

#[tokio::main]
async fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .init();

    let config = ServerConfig::new()
        .with_stack(StackServerConfig::new().with_endpoint_url("opc.tcp://localhost:4841"))
        .with_max_nodes_per_read(100);
    let server = UaServer::new(config);

    for (i, name) in ["Tank1", "Tank2", "Tank3"].into_iter().enumerate() {
        let node = Node::builder(NodeId::numeric(2, 100 + i as u32), NodeClass::Object)
            .with_browse_name(QualifiedName::new(2, name))
            .with_user_write_mask(AttributeId::DisplayName.write_mask_bit().unwrap_or_default())
            .with_filter(LoggingFilter::default())
            .with_filter(AccessControlFilter)
            .build()
            .unwrap();
        server.add_node(node).unwrap();
    }

    let token = NodeId::numeric(0, 5001);
    server.sessions().activate(
        token.clone(),
        Session::new(NodeId::numeric(1, 1), "demo", UserIdentity::Anonymous),
    );

    let (transport, mut broker) = LocalTransport::new(server.config().stack.clone());
    let channel = transport.open_channel(1);

    let writer = tokio::spawn(async move {
        while let Some(outbound) = broker.rx_outbound.recv().await {
            info!(
                "Channel {} <- handle {} result {}",
                outbound.channel_id,
                outbound.message.request_handle(),
                outbound.message.service_result()
            );
        }
    });

    let write = transport.submit(
        server.dispatcher(),
        &channel,
        WriteRequest {
            request_header: RequestHeader::new(token.clone(), 1),
            nodes_to_write: vec![
                WriteValue::new(
                    NodeId::numeric(2, 100),
                    AttributeId::DisplayName,
                    DataValue::new(LocalizedText::text("Raw water tank")),
                ),
                WriteValue::new(
                    NodeId::numeric(2, 101),
                    AttributeId::BrowseName,
                    DataValue::new(QualifiedName::new(2, "Renamed")),
                ),
            ],
        },
    );
    info!("Write outcome: {:?}", write.outcome().await);

    let read = transport.submit(
        server.dispatcher(),
        &channel,
        ReadRequest {
            request_header: RequestHeader::new(token, 2),
            max_age: 0.0,
            nodes_to_read: (100..104)
                .map(|id| ReadValueId::new(NodeId::numeric(2, id), AttributeId::DisplayName))
                .collect(),
        },
    );
    info!("Read outcome: {:?}", read.outcome().await);

    // unknown session
    let fault = transport.submit(
        server.dispatcher(),
        &channel,
        ReadRequest {
            request_header: RequestHeader::new(NodeId::numeric(0, 1), 3),
            max_age: 0.0,
            nodes_to_read: vec![ReadValueId::new(NodeId::numeric(2, 100), AttributeId::NodeId)],
        },
    );
    info!("Fault outcome: {:?}", fault.outcome().await);

    server.shutdown();
    drop(transport);
    _ = tokio::time::timeout(std::time::Duration::from_millis(100), writer).await;
}
