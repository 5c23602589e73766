//! Lifecycle of a bridge attached to a widget window

use crate::{
    handler::{PreparedCall, RpcHandler},
    transport::{TransportAdapter, WindowHost, WindowId, WindowMessage},
    validate::MessageValidator,
};
use parking_lot::Mutex;
use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Duration,
};
use tokio::{
    sync::mpsc::UnboundedReceiver,
    task::{JoinHandle, JoinSet},
};

/// A running bridge between a widget window and an [`RpcHandler`].
///
/// Requests are decoded in the order they are received, and handlers that never suspend are
/// answered on the spot. Every other request is awaited in its own task, so a slow handler never
/// delays the response to a fast one. Dropping the bridge disposes it.
#[derive(Debug)]
pub struct Bridge {
    transport: Arc<TransportAdapter>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Bridge {
    /// Attaches to `widget` on `host` and starts serving its requests with `handler`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<Handler: RpcHandler>(
        handler: Handler,
        host: Arc<dyn WindowHost>,
        widget: WindowId,
        request_timeout: Option<Duration>,
    ) -> Self {
        let (transport, inbound) = TransportAdapter::attach(host, widget);
        let validator = MessageValidator::new(widget);
        let listener = tokio::spawn(listen(
            inbound,
            validator,
            handler,
            transport.clone(),
            request_timeout,
        ));
        debug!(target: "bridge", %widget, ?request_timeout, "bridge attached");
        Self { transport, listener: Mutex::new(Some(listener)) }
    }

    /// The widget window this bridge serves.
    pub fn widget(&self) -> WindowId {
        self.transport.target()
    }

    /// Returns true once the bridge has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.transport.is_disposed()
    }

    /// Tears the bridge down immediately.
    ///
    /// The listener is removed from the host and requests still in flight are abandoned, their
    /// responses are never posted. Calling this more than once has no effect.
    pub fn dispose(&self) {
        if self.transport.is_disposed() {
            return;
        }
        self.transport.dispose();
        if let Some(listener) = self.listener.lock().take() {
            listener.abort();
        }
        debug!(target: "bridge", widget = %self.transport.target(), "bridge disposed");
    }

    /// Stops accepting messages, waits for the requests already received to be answered and
    /// disposes the bridge.
    pub async fn shutdown(self) {
        self.transport.unsubscribe();
        let listener = self.listener.lock().take();
        if let Some(listener) = listener {
            if let Err(err) = listener.await {
                error!(target: "bridge", %err, "bridge listener failed");
            }
        }
        self.dispose();
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Serves `inbound` until the host stops delivering messages.
async fn listen<Handler: RpcHandler>(
    mut inbound: UnboundedReceiver<WindowMessage>,
    validator: MessageValidator,
    handler: Handler,
    transport: Arc<TransportAdapter>,
    request_timeout: Option<Duration>,
) {
    let mut in_flight = JoinSet::new();
    loop {
        tokio::select! {
            message = inbound.recv() => {
                let Some(message) = message else { break };
                let Some(call) = validator.validate(&message) else {
                    trace!(target: "bridge", source = %message.source, "ignoring non-rpc message");
                    continue;
                };
                // decoding and in-place handlers run here, in receive order
                let prepared = panic::catch_unwind(AssertUnwindSafe(|| handler.prepare(call)));
                let pending = match prepared {
                    Ok(PreparedCall::Ready(response)) => {
                        transport.post(&response);
                        continue;
                    }
                    Ok(PreparedCall::Pending(pending)) => pending,
                    Err(_) => {
                        error!(target: "bridge", "rpc handler panicked, request left unanswered");
                        continue;
                    }
                };
                let handler = handler.clone();
                let transport = transport.clone();
                in_flight.spawn(async move {
                    let response = pending.settle(&handler, request_timeout).await;
                    transport.post(&response);
                });
            }
            Some(res) = in_flight.join_next(), if !in_flight.is_empty() => {
                log_task_result(res);
            }
        }
    }

    while let Some(res) = in_flight.join_next().await {
        log_task_result(res);
    }
    trace!(target: "bridge", "bridge listener stopped");
}

fn log_task_result(res: Result<(), tokio::task::JoinError>) {
    if let Err(err) = res {
        if err.is_panic() {
            error!(target: "bridge", %err, "rpc handler panicked, request left unanswered");
        }
    }
}
