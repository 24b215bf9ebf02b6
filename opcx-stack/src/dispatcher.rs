use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, Weak,
    },
    time::Duration,
};

use async_trait::async_trait;
use log::{debug, error, info, warn};
use opcx_types::{messages::RequestMessage, StatusCode, UaError};

use crate::{ServiceRequest, ServiceResponse, StackServerConfig};

/// Processes one kind of service request.
///
/// Handlers return the response instead of resolving the request themselves; the
/// [ServiceDispatcher] turns the returned value, an error, a panic or a timeout into
/// exactly one resolution.
#[async_trait]
pub trait ServiceHandler {
    async fn handle(&self, request: &ServiceRequest) -> Result<ServiceResponse, UaError>;
}

pub type DynServiceHandler = dyn ServiceHandler + Send + Sync;

type PendingMap = Mutex<HashMap<u64, ServiceRequest>>;

fn lock(pending: &PendingMap) -> MutexGuard<'_, HashMap<u64, ServiceRequest>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Registration {
    service: &'static str,
    handler: Arc<DynServiceHandler>,
}

/// Hands service requests to their handlers on worker tasks and resolves each of them
/// exactly once.
///
/// Requests still in flight when their secure channel closes, or when the dispatcher
/// shuts down, are faulted so nothing awaiting them hangs. Requests dispatched after
/// shutdown are faulted with `Bad_Shutdown` without reaching a handler.
pub struct ServiceDispatcher {
    config: StackServerConfig,
    handlers: HashMap<TypeId, Registration>,
    pending: Arc<PendingMap>,
    next_id: AtomicU64,
    shut_down: AtomicBool,
}

impl ServiceDispatcher {
    pub fn new(config: StackServerConfig) -> Self {
        Self {
            config,
            handlers: HashMap::new(),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Register the handler for requests of type `R`, replacing any previous handler.
    pub fn register<R, H>(&mut self, handler: H)
    where
        R: RequestMessage,
        H: ServiceHandler + Send + Sync + 'static,
    {
        self.register_shared::<R>(Arc::new(handler))
    }

    pub fn register_shared<R: RequestMessage>(&mut self, handler: Arc<DynServiceHandler>) {
        let service = std::any::type_name::<R>()
            .rsplit("::")
            .next()
            .unwrap_or("unknown");
        debug!("Registered handler for {service}");
        self.handlers
            .insert(TypeId::of::<R>(), Registration { service, handler });
    }

    pub fn config(&self) -> &StackServerConfig {
        &self.config
    }

    /// Number of requests handed to a handler and not yet resolved.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }

    fn timeout_for(&self, request: &ServiceRequest) -> Duration {
        match request.request_header().timeout_hint {
            0 => self.config.request_timeout,
            hint => self.config.request_timeout.min(Duration::from_millis(hint as u64)),
        }
    }

    fn track(&self, request: &ServiceRequest) -> Result<(), StatusCode> {
        let id = {
            let mut pending = lock(&self.pending);
            // checked under the lock so shutdown cannot miss a request being tracked
            if self.is_shut_down() {
                return Err(StatusCode::BAD_SHUTDOWN);
            }
            if pending.len() >= self.config.max_pending_requests {
                return Err(StatusCode::BAD_TOO_MANY_OPERATIONS);
            }
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            pending.insert(id, request.clone());
            id
        };
        let pending: Weak<PendingMap> = Arc::downgrade(&self.pending);
        request.on_resolved(move |_| {
            if let Some(pending) = pending.upgrade() {
                lock(&pending).remove(&id);
            }
        });
        Ok(())
    }

    /// Process `request` on a worker task.
    ///
    /// Must be called from within a tokio runtime. The request is always resolved: with
    /// the handler's response, or with a fault when the dispatcher is shut down, no handler
    /// is registered, too many requests are pending, or the handler fails, panics or
    /// exceeds its timeout.
    pub fn dispatch(&self, request: ServiceRequest) {
        if self.is_shut_down() {
            debug!("Dispatcher is shut down, rejecting {request:?}");
            _ = request.set_service_fault_status(StatusCode::BAD_SHUTDOWN);
            return;
        }

        let type_id = Any::type_id(request.request().as_any());
        let Some(registration) = self.handlers.get(&type_id) else {
            warn!(
                "No handler for {}, rejecting {request:?}",
                request.request().type_name()
            );
            _ = request.set_service_fault_status(StatusCode::BAD_SERVICE_UNSUPPORTED);
            return;
        };

        if let Err(status) = self.track(&request) {
            warn!("Rejecting {request:?}: {status}");
            _ = request.set_service_fault_status(status);
            return;
        }

        let handler = registration.handler.clone();
        let service = registration.service;
        let timeout = self.timeout_for(&request);

        tokio::spawn(async move {
            let mut worker = {
                let request = request.clone();
                tokio::spawn(async move { handler.handle(&request).await })
            };

            let result = match tokio::time::timeout(timeout, &mut worker).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    error!("{service} handler failed for {request:?}: {e}");
                    Err(UaError::with_message(StatusCode::BAD_INTERNAL_ERROR, e.to_string()))
                }
                Err(_) => {
                    worker.abort();
                    warn!("{service} handler timed out after {timeout:?} for {request:?}");
                    Err(UaError::new(StatusCode::BAD_TIMEOUT))
                }
            };

            if let Err(e) = request.complete(result) {
                debug!("Discarding late {service} result for {request:?}: {e}");
            }
        });
    }

    fn fault_where<F>(&self, status: StatusCode, predicate: F) -> usize
    where
        F: Fn(&ServiceRequest) -> bool,
    {
        let requests: Vec<ServiceRequest> = lock(&self.pending)
            .values()
            .filter(|request| predicate(*request))
            .cloned()
            .collect();

        requests
            .iter()
            .filter(|request| request.complete(Err(UaError::new(status))).is_ok())
            .count()
    }

    /// Fault every pending request that arrived on `channel_id`. Returns how many were faulted.
    pub fn channel_closed(&self, channel_id: u32) -> usize {
        let faulted = self.fault_where(StatusCode::BAD_SECURE_CHANNEL_CLOSED, |request| {
            request.secure_channel().channel_id() == channel_id
        });
        if faulted > 0 {
            info!("Secure channel {channel_id} closed, faulted {faulted} pending requests");
        }
        faulted
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Fault every pending request and reject everything dispatched afterwards.
    /// Returns how many pending requests were faulted.
    pub fn shutdown(&self) -> usize {
        {
            let _pending = lock(&self.pending);
            self.shut_down.store(true, Ordering::Release);
        }
        let faulted = self.fault_where(StatusCode::BAD_SHUTDOWN, |_| true);
        info!("Dispatcher shutting down, faulted {faulted} pending requests");
        faulted
    }
}
