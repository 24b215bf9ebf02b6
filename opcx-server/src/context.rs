use std::sync::Arc;

use crate::Session;

/// Who is performing an attribute operation.
///
/// `Internal` callers are the server itself and are trusted. Access checks that depend on
/// a session must let them through rather than treat them as unauthenticated.
#[derive(Debug, Clone)]
pub enum AttributeContext {
    Internal,
    Session(Arc<Session>),
}

impl AttributeContext {
    pub fn session(&self) -> Option<&Arc<Session>> {
        match self {
            AttributeContext::Internal => None,
            AttributeContext::Session(session) => Some(session),
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, AttributeContext::Internal)
    }
}

impl From<Arc<Session>> for AttributeContext {
    fn from(value: Arc<Session>) -> Self {
        AttributeContext::Session(value)
    }
}
