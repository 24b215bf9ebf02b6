use crate::StackServerConfig;

/// The message security applied on a secure channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSecurityMode {
    None,
    Sign,
    SignAndEncrypt,
}

/// The secure channel a request arrived on.
///
/// Channel establishment and message protection are provided by the transport; a
/// [ServiceRequest](crate::ServiceRequest) only needs to know which channel it is scoped to.
pub trait SecureChannel {
    /// Server assigned identifier of the channel.
    fn channel_id(&self) -> u32;

    /// URI of the security policy the channel was opened with.
    fn security_policy_uri(&self) -> &str;

    fn security_mode(&self) -> MessageSecurityMode;
}

pub type DynSecureChannel = dyn SecureChannel + Send + Sync;

/// The stack server a request is being processed by.
pub trait StackServer {
    fn config(&self) -> &StackServerConfig;

    /// The endpoint the server is reachable on.
    fn endpoint_url(&self) -> &str {
        &self.config().endpoint_url
    }
}

pub type DynStackServer = dyn StackServer + Send + Sync;
