use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use log::{info, LevelFilter};
use opcx::server::{
    filters::{AccessControlFilter, AttributeOverride, LoggingFilter},
    AttributeContext, AttributeFilter, AttributeFilterContext, Node, Session, UserIdentity,
};
use opcx::types::{
    AttributeId, LocalizedText, NodeClass, NodeId, QualifiedName, UaError, Variant,
};

/// Counts how often each node is read.
#[derive(Default)]
struct ReadCounter {
    reads: AtomicUsize,
}

impl AttributeFilter for ReadCounter {
    fn get_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
    ) -> Result<Variant, UaError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        ctx.get_attribute(attribute_id)
    }
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .init();

    let counter = Arc::new(ReadCounter::default());
    let node = Node::builder(NodeId::string(2, "Pump1"), NodeClass::Object)
        .with_browse_name(QualifiedName::new(2, "Pump1"))
        .with_user_write_mask(AttributeId::DisplayName.write_mask_bit().unwrap_or_default())
        .with_shared_filter(counter.clone())
        .with_filter(LoggingFilter::default())
        .with_filter(AccessControlFilter)
        .with_filter(AttributeOverride::new(
            AttributeId::Description,
            LocalizedText::new("en", "Feed water pump"),
        ))
        .build()
        .unwrap();

    let internal = AttributeContext::Internal;
    let operator = AttributeContext::Session(Arc::new(Session::new(
        NodeId::numeric(1, 1),
        "operator",
        UserIdentity::UserName("operator".into()),
    )));

    for attribute_id in AttributeId::BASE {
        match node.read_attribute(&operator, attribute_id.id()) {
            Ok(value) => info!("{attribute_id}: {:?}", value.value),
            Err(e) => info!("{attribute_id}: {e}"),
        }
    }

    if let Err(e) = node.set_display_name(&operator, LocalizedText::text("Feed pump")) {
        info!("Operator could not rename the pump: {e}");
    }
    if let Err(e) = node.set_browse_name(&operator, QualifiedName::new(2, "Pump2")) {
        info!("Operator could not change the browse name: {e}");
    }
    if let Err(e) = node.set_write_mask(&internal, 0x3) {
        info!("Server could not change the write mask: {e}");
    }

    info!(
        "Display name is now {:?}, {} reads went through the chain",
        node.display_name(&internal).map(|name| name.text),
        counter.reads.load(Ordering::Relaxed)
    );
}
