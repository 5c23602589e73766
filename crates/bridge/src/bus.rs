//! In-memory [`WindowHost`]

use crate::{
    error::TransportError,
    transport::{ListenerId, WindowHost, WindowId, WindowMessage},
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// A message bus shared by a set of windows.
///
/// Every message dispatched on the bus is delivered to every listener, posts are delivered to
/// the inbox of a single window. Used by the CLI host and in tests.
#[derive(Debug, Default)]
pub struct MessageBus {
    inner: Mutex<BusInner>,
}

#[derive(Debug, Default)]
struct BusInner {
    next_listener: u64,
    next_window: u64,
    listeners: Vec<(ListenerId, UnboundedSender<WindowMessage>)>,
    windows: HashMap<WindowId, UnboundedSender<Value>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new window and returns its id together with its inbox.
    pub fn open_window(&self) -> (WindowId, UnboundedReceiver<Value>) {
        let (tx, rx) = unbounded_channel();
        let mut inner = self.inner.lock();
        inner.next_window += 1;
        let id = WindowId::new(inner.next_window);
        inner.windows.insert(id, tx);
        (id, rx)
    }

    /// Closes a window, later posts to it fail.
    pub fn close_window(&self, id: WindowId) {
        self.inner.lock().windows.remove(&id);
    }

    /// Dispatches a message posted by `source` to all listeners.
    ///
    /// Returns the number of listeners the message was delivered to.
    pub fn dispatch(&self, source: WindowId, data: Value) -> usize {
        let message = WindowMessage::new(source, data);
        let mut inner = self.inner.lock();
        // listeners whose receiver is gone are pruned on the way
        inner.listeners.retain(|(_, tx)| !tx.is_closed());
        inner.listeners.iter().filter(|(_, tx)| tx.send(message.clone()).is_ok()).count()
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }
}

impl WindowHost for MessageBus {
    fn add_listener(&self) -> (ListenerId, UnboundedReceiver<WindowMessage>) {
        let (tx, rx) = unbounded_channel();
        let mut inner = self.inner.lock();
        inner.next_listener += 1;
        let id = ListenerId(inner.next_listener);
        inner.listeners.push((id, tx));
        (id, rx)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.inner.lock().listeners.retain(|(listener, _)| *listener != id);
    }

    fn post_message(&self, target: WindowId, payload: Value) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        let Some(inbox) = inner.windows.get(&target) else {
            return Err(TransportError::WindowUnavailable(target));
        };
        if inbox.send(payload).is_err() {
            inner.windows.remove(&target);
            return Err(TransportError::WindowUnavailable(target));
        }
        Ok(())
    }
}
