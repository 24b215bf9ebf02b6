#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use opcx_server::{
    AttributeContext, AttributeFilter, AttributeFilterContext, DynAttributeFilter, Node, Session,
    UserIdentity,
};
use opcx_types::{AttributeId, NodeClass, NodeId, QualifiedName, UaError, Variant};

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// Records every operation it sees as `<name>:<get|set>:<attribute>` then delegates.
pub struct Recorder {
    name: &'static str,
    journal: Journal,
}

impl Recorder {
    pub fn new(name: &'static str, journal: &Journal) -> Arc<DynAttributeFilter> {
        Arc::new(Self {
            name,
            journal: journal.clone(),
        })
    }

    fn record(&self, op: &str, attribute_id: AttributeId) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{op}:{attribute_id}", self.name));
    }
}

impl AttributeFilter for Recorder {
    fn get_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
    ) -> Result<Variant, UaError> {
        self.record("get", attribute_id);
        ctx.get_attribute(attribute_id)
    }

    fn set_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), UaError> {
        self.record("set", attribute_id);
        ctx.set_attribute(attribute_id, value)
    }
}

pub fn node_with(filters: Vec<Arc<DynAttributeFilter>>) -> Node {
    filters
        .into_iter()
        .fold(
            Node::builder(NodeId::numeric(2, 1001), NodeClass::Variable)
                .with_browse_name(QualifiedName::new(2, "Pressure"))
                .with_description("Line pressure"),
            |builder, filter| builder.with_shared_filter(filter),
        )
        .build()
        .unwrap()
}

pub fn session(name: &str) -> Arc<Session> {
    Arc::new(Session::new(
        NodeId::string(1, name),
        name,
        UserIdentity::UserName(name.into()),
    ))
}

pub fn session_context(name: &str) -> AttributeContext {
    AttributeContext::Session(session(name))
}
