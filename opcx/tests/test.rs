use opcx::{
    server::{filters::LoggingFilter, AttributeContext, Node},
    types::{AttributeId, DataValue, NodeClass, NodeId, QualifiedName, StatusCode},
};

#[test]
pub fn test() {
    let node = Node::builder(NodeId::numeric(2, 1), NodeClass::Object)
        .with_browse_name(QualifiedName::new(2, "Line1"))
        .with_filter(LoggingFilter::default())
        .build()
        .unwrap();

    let value = node
        .read_attribute(&AttributeContext::Internal, AttributeId::BrowseName.id())
        .unwrap();
    assert_eq!(value.extract::<QualifiedName>().unwrap().name, "Line1");
    assert_eq!(
        node.write_attribute(&AttributeContext::Internal, 0, DataValue::new(1u32))
            .unwrap_err()
            .status(),
        StatusCode::BAD_ATTRIBUTE_ID_INVALID
    );
}
