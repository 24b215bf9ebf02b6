use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use log::debug;
use opcx_types::NodeId;

/// The user a session was activated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentity {
    Anonymous,
    UserName(String),
}

/// An activated client session.
///
/// Session establishment happens elsewhere; this is what attribute access needs to know
/// about the caller.
#[derive(Debug, Clone)]
pub struct Session {
    session_id: NodeId,
    name: String,
    identity: UserIdentity,
}

impl Session {
    pub fn new<S: Into<String>>(session_id: NodeId, name: S, identity: UserIdentity) -> Self {
        Self {
            session_id,
            name: name.into(),
            identity,
        }
    }

    pub fn session_id(&self) -> &NodeId {
        &self.session_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }
}

/// Active sessions keyed by the authentication token clients put in their request headers.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<NodeId, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `session` under `authentication_token`, returning the session it replaced.
    pub fn activate(&self, authentication_token: NodeId, session: Session) -> Option<Arc<Session>> {
        debug!(
            "Session {} activated for {:?}",
            session.session_id, session.identity
        );
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(authentication_token, Arc::new(session))
    }

    pub fn close(&self, authentication_token: &NodeId) -> Option<Arc<Session>> {
        let session = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(authentication_token);
        if let Some(session) = &session {
            debug!("Session {} closed", session.session_id);
        }
        session
    }

    pub fn get(&self, authentication_token: &NodeId) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(authentication_token)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
