use std::{
    error::Error,
    fmt,
    pin::pin,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::warn;
use opcx_types::{
    messages::{DynRequestMessage, RequestHeader, ResponseHeader, ResponseMessage, ServiceFault},
    StatusCode, UaError,
};
use tokio::sync::Notify;

use crate::{
    DynSecureChannel, DynStackServer, Outbound, ResolveError, ServiceResponse, ServiceResult,
};

type Callback = Box<dyn FnOnce(&ServiceResult) + Send>;

#[derive(Default)]
struct SlotState {
    outcome: Option<ServiceResult>,
    callbacks: Vec<Callback>,
}

/// Single assignment cell holding the outcome of a request.
#[derive(Default)]
struct ResultSlot {
    state: Mutex<SlotState>,
    resolved: Condvar,
    notify: Notify,
}

impl ResultSlot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, result: ServiceResult) -> Result<(), ResolveError> {
        let callbacks = {
            let mut state = self.lock();
            if let Some(existing) = &state.outcome {
                return Err(ResolveError::from_existing(existing));
            }
            state.outcome = Some(result.clone());
            std::mem::take(&mut state.callbacks)
        };
        self.resolved.notify_all();
        self.notify.notify_waiters();
        for callback in callbacks {
            callback(&result);
        }
        Ok(())
    }

    fn get(&self) -> Option<ServiceResult> {
        self.lock().outcome.clone()
    }

    async fn wait(&self) -> ServiceResult {
        loop {
            let mut notified = pin!(self.notify.notified());
            // register before checking so a completion in between is not missed
            notified.as_mut().enable();
            if let Some(outcome) = self.get() {
                return outcome;
            }
            notified.await;
        }
    }

    fn wait_timeout(&self, timeout: Duration) -> Option<ServiceResult> {
        let state = self.lock();
        let (state, _) = self
            .resolved
            .wait_timeout_while(state, timeout, |state| state.outcome.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state.outcome.clone()
    }

    fn on_resolved(&self, callback: Callback) {
        let mut state = self.lock();
        if let Some(outcome) = state.outcome.clone() {
            drop(state);
            callback(&outcome);
            return;
        }
        state.callbacks.push(callback);
    }
}

struct Inner {
    request: Arc<DynRequestMessage>,
    server: Arc<DynStackServer>,
    secure_channel: Arc<DynSecureChannel>,
    slot: ResultSlot,
}

/// One inbound service invocation awaiting exactly one response or fault.
///
/// A `ServiceRequest` is cheap to clone; clones share the same result slot, so the
/// producer resolving a request and the consumers awaiting it can hold their own handles.
/// The first resolution wins, later attempts are rejected with [ResolveError] and never
/// alter the delivered outcome.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use opcx_stack::{ServiceRequest, DynSecureChannel, DynStackServer};
/// # use opcx_types::{messages::{ReadRequest, ReadResponse, RequestHeader, ResponseMessage}, NodeId};
/// # async fn example(server: Arc<DynStackServer>, channel: Arc<DynSecureChannel>) {
/// let read = ReadRequest {
///     request_header: RequestHeader::new(NodeId::numeric(0, 1), 42),
///     max_age: 0.0,
///     nodes_to_read: vec![],
/// };
/// let request = ServiceRequest::new(Arc::new(read), server, channel);
///
/// let response = ReadResponse {
///     response_header: request.create_response_header(),
///     results: vec![],
/// };
/// request.set_response(response).unwrap();
///
/// let outcome = request.outcome().await.unwrap();
/// assert_eq!(outcome.response_header().request_handle, 42);
/// # }
/// ```
#[derive(Clone)]
pub struct ServiceRequest {
    inner: Arc<Inner>,
}

impl ServiceRequest {
    pub fn new(
        request: Arc<DynRequestMessage>,
        server: Arc<DynStackServer>,
        secure_channel: Arc<DynSecureChannel>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                request,
                server,
                secure_channel,
                slot: ResultSlot::default(),
            }),
        }
    }

    pub fn request(&self) -> &DynRequestMessage {
        self.inner.request.as_ref()
    }

    pub fn request_header(&self) -> &RequestHeader {
        self.inner.request.request_header()
    }

    pub fn server(&self) -> &Arc<DynStackServer> {
        &self.inner.server
    }

    pub fn secure_channel(&self) -> &Arc<DynSecureChannel> {
        &self.inner.secure_channel
    }

    /// Resolve the request with `result` without logging a rejected resolution.
    pub(crate) fn complete(&self, result: ServiceResult) -> Result<(), ResolveError> {
        self.inner.slot.complete(result)
    }

    fn resolve(&self, result: ServiceResult) -> Result<(), ResolveError> {
        self.complete(result).inspect_err(|e| {
            warn!("Ignoring resolution of {self:?}: {e}");
        })
    }

    /// Resolve the request with a response.
    pub fn set_response<R: ResponseMessage>(&self, response: R) -> Result<(), ResolveError> {
        self.resolve(Ok(Arc::new(response)))
    }

    /// Resolve the request with an already shared response.
    pub fn set_shared_response(&self, response: ServiceResponse) -> Result<(), ResolveError> {
        self.resolve(Ok(response))
    }

    /// Resolve the request with a service fault.
    pub fn set_service_fault(&self, error: UaError) -> Result<(), ResolveError> {
        self.resolve(Err(error))
    }

    /// Resolve the request with a generic service fault carrying `status`.
    pub fn set_service_fault_status<S: Into<StatusCode>>(
        &self,
        status: S,
    ) -> Result<(), ResolveError> {
        self.set_service_fault(UaError::with_message(status, "ServiceFault"))
    }

    /// Resolve the request with a service fault for an arbitrary error.
    ///
    /// A [UaError] is delivered as is, anything else is wrapped as `Bad_UnexpectedError`.
    pub fn set_service_fault_error<E: Error + 'static>(&self, error: E) -> Result<(), ResolveError> {
        self.set_service_fault(UaError::from_dyn(&error))
    }

    /// A `Good` response header correlated to this request.
    pub fn create_response_header(&self) -> ResponseHeader {
        self.create_response_header_with(StatusCode::GOOD)
    }

    pub fn create_response_header_with<S: Into<StatusCode>>(&self, service_result: S) -> ResponseHeader {
        ResponseHeader::new(self.request_header().request_handle, service_result.into())
    }

    /// Build a fault correlated to this request. The request is not resolved.
    pub fn create_service_fault<S: Into<StatusCode>>(&self, status: S) -> ServiceFault {
        ServiceFault::new(self.create_response_header_with(status))
    }

    /// Build a fault correlated to this request from an error. The request is not resolved.
    pub fn create_service_fault_from_error(&self, error: &(dyn Error + 'static)) -> ServiceFault {
        self.create_service_fault(UaError::from_dyn(error).status())
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.slot.get().is_some()
    }

    /// The outcome, if the request has been resolved.
    pub fn try_outcome(&self) -> Option<ServiceResult> {
        self.inner.slot.get()
    }

    /// Wait until the request is resolved.
    ///
    /// Any number of tasks may wait; all of them observe the same outcome.
    pub async fn outcome(&self) -> ServiceResult {
        self.inner.slot.wait().await
    }

    /// Block the calling thread until the request is resolved or `timeout` elapses.
    ///
    /// Bridges into synchronous code; never call this from an async task.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<ServiceResult> {
        self.inner.slot.wait_timeout(timeout)
    }

    /// Run `callback` once with the outcome.
    ///
    /// Runs immediately if the request is already resolved, otherwise on the thread that
    /// resolves it.
    pub fn on_resolved<F>(&self, callback: F)
    where
        F: FnOnce(&ServiceResult) + Send + 'static,
    {
        self.inner.slot.on_resolved(Box::new(callback))
    }

    /// Wait for the outcome and turn it into what the transport writes back.
    pub async fn outbound(&self) -> Outbound {
        match self.outcome().await {
            Ok(response) => Outbound::Response(response),
            Err(err) => Outbound::Fault(self.create_service_fault(err.status())),
        }
    }
}

impl fmt::Debug for ServiceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRequest")
            .field("request", &self.inner.request.type_name())
            .field("request_handle", &self.request_header().request_handle)
            .field("channel_id", &self.inner.secure_channel.channel_id())
            .finish()
    }
}
