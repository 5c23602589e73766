//! Filtering of bus traffic

use crate::transport::{WindowId, WindowMessage};
use widget_rpc::request::RpcRequest;

/// Decides whether a message on the bus is an RPC request from the attached widget.
///
/// Anything else, including well formed requests posted by another window, is not RPC traffic
/// as far as the bridge is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageValidator {
    source: WindowId,
}

impl MessageValidator {
    /// Accepts requests posted by `source` only.
    pub const fn new(source: WindowId) -> Self {
        Self { source }
    }

    /// The window requests must come from.
    pub const fn source(&self) -> WindowId {
        self.source
    }

    /// Returns the request carried by `message`, if it is one.
    pub fn validate(&self, message: &WindowMessage) -> Option<RpcRequest> {
        if message.source != self.source {
            return None;
        }
        RpcRequest::from_message(&message.data)
    }

    /// Returns true if `message` is an RPC request from the attached widget.
    pub fn is_rpc_request(&self, message: &WindowMessage) -> bool {
        self.validate(message).is_some()
    }
}
