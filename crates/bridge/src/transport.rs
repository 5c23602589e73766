//! The cross-window channel the bridge listens on and posts through

use crate::error::TransportError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Identifies a window, or frame, on the host's message bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// A message seen on the bus, together with the window that posted it.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowMessage {
    pub source: WindowId,
    pub data: Value,
}

impl WindowMessage {
    pub fn new(source: WindowId, data: Value) -> Self {
        Self { source, data }
    }
}

/// Handle of a registered bus listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The host's cross-window message channel.
///
/// The bus is shared with traffic that has nothing to do with the bridge, every listener sees
/// every message.
pub trait WindowHost: Send + Sync + 'static {
    /// Registers a listener that receives every message posted on the bus from now on.
    fn add_listener(&self) -> (ListenerId, UnboundedReceiver<WindowMessage>);

    /// Removes a listener, no further messages are delivered to it.
    fn remove_listener(&self, id: ListenerId);

    /// Delivers `payload` to `target`.
    fn post_message(&self, target: WindowId, payload: Value) -> Result<(), TransportError>;
}

/// Binds the bridge to one window on a [`WindowHost`].
///
/// Subscribes once on [`attach`](Self::attach) and unsubscribes exactly once, on
/// [`unsubscribe`](Self::unsubscribe), [`dispose`](Self::dispose) or drop, whichever comes first.
pub struct TransportAdapter {
    host: Arc<dyn WindowHost>,
    /// The window responses are posted to
    target: WindowId,
    listener: Mutex<Option<ListenerId>>,
    disposed: AtomicBool,
}

impl TransportAdapter {
    /// Subscribes to `host` and returns the adapter together with the inbound message stream.
    pub fn attach(
        host: Arc<dyn WindowHost>,
        target: WindowId,
    ) -> (Arc<Self>, UnboundedReceiver<WindowMessage>) {
        let (listener, inbound) = host.add_listener();
        trace!(target: "transport", window = %target, ?listener, "attached to window host");
        let adapter = Self {
            host,
            target,
            listener: Mutex::new(Some(listener)),
            disposed: AtomicBool::new(false),
        };
        (Arc::new(adapter), inbound)
    }

    /// The window this adapter posts to.
    pub fn target(&self) -> WindowId {
        self.target
    }

    /// Returns true once the adapter has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Returns true while the adapter is registered on the host.
    pub fn is_subscribed(&self) -> bool {
        self.listener.lock().is_some()
    }

    /// Serializes `payload` and posts it to the target window.
    pub fn try_post<T: Serialize>(&self, payload: &T) -> Result<(), TransportError> {
        if self.is_disposed() {
            return Err(TransportError::Disposed);
        }
        let payload = serde_json::to_value(payload)?;
        self.host.post_message(self.target, payload)
    }

    /// Same as [`try_post`](Self::try_post) but drops the message on failure.
    ///
    /// Returns whether the message was delivered.
    pub fn post<T: Serialize>(&self, payload: &T) -> bool {
        match self.try_post(payload) {
            Ok(()) => true,
            Err(TransportError::Serialize(err)) => {
                error!(target: "transport", %err, "dropping unserializable message");
                false
            }
            Err(err) => {
                debug!(target: "transport", %err, "dropping message");
                false
            }
        }
    }

    /// Stops receiving messages from the host, already queued messages stay readable.
    pub fn unsubscribe(&self) {
        if let Some(listener) = self.listener.lock().take() {
            self.host.remove_listener(listener);
            trace!(target: "transport", window = %self.target, ?listener, "detached from window host");
        }
    }

    /// Unsubscribes and drops every later post.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
        self.unsubscribe();
    }
}

impl Drop for TransportAdapter {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for TransportAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportAdapter")
            .field("target", &self.target)
            .field("listener", &*self.listener.lock())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
