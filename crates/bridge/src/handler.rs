//! Dispatch of a single widget request

use crate::{api::WalletApi, eth::WidgetRequest};
use serde::de::DeserializeOwned;
use std::time::Duration;
use widget_rpc::{
    error::RpcError,
    request::{Id, RpcRequest},
    response::{ResponseResult, RpcResponse},
};

/// A call decoded by [`RpcHandler::prepare`].
#[derive(Debug)]
pub enum PreparedCall<R> {
    /// The call was answered without suspending
    Ready(RpcResponse),
    /// The call needs to be awaited through [`RpcHandler::on_request`]
    Pending(PendingCall<R>),
}

/// A decoded request waiting for its handler to settle.
#[derive(Debug)]
pub struct PendingCall<R> {
    pub id: Id,
    pub method: String,
    pub request: R,
}

impl<R: Send + Sync> PendingCall<R> {
    /// Awaits the handler, answering with a `LimitExceeded` error if it does not settle within
    /// `timeout`.
    pub async fn settle<Handler>(self, handler: &Handler, timeout: Option<Duration>) -> RpcResponse
    where
        Handler: RpcHandler<Request = R>,
    {
        let Self { id, method, request } = self;
        let Some(timeout) = timeout else {
            return RpcResponse::new(id, handler.on_request(request).await);
        };
        match tokio::time::timeout(timeout, handler.on_request(request)).await {
            Ok(result) => {
                trace!(target: "rpc", "sending rpc result {result:?}");
                RpcResponse::new(id, result)
            }
            Err(_) => {
                warn!(target: "rpc", %id, "`{method}` did not settle within {timeout:?}");
                RpcResponse::new(id, RpcError::request_timeout(timeout))
            }
        }
    }
}

/// Helper trait that is used to execute widget rpc calls
#[async_trait::async_trait]
pub trait RpcHandler: Clone + Send + Sync + 'static {
    /// The request type to expect
    type Request: DeserializeOwned + Send + Sync;

    /// Names of the methods `Request` can be decoded from
    const METHODS: &'static [&'static str];

    /// Settles `request` in place if that needs no suspension, otherwise hands it back.
    ///
    /// Runs on the listener before the next message is looked at, so whatever it reads or writes
    /// is ordered with the surrounding calls.
    fn try_settle(&self, request: Self::Request) -> Result<ResponseResult, Self::Request> {
        Err(request)
    }

    /// Invoked for requests that were not settled by [`Self::try_settle`]
    async fn on_request(&self, request: Self::Request) -> ResponseResult;

    /// Decodes an accepted [`RpcRequest`] and settles it if possible.
    ///
    /// Methods outside of [`Self::METHODS`] are answered with `MethodNotFound`. A known method
    /// whose `{ "method" : "<name>", "params": [..] }` object does not deserialize into
    /// `Request` is answered with `InvalidParams`.
    fn prepare(&self, call: RpcRequest) -> PreparedCall<Self::Request> {
        trace!(target: "rpc", "received method call {call:?}");
        let req = call.to_call();
        let RpcRequest { id, method, .. } = call;

        if !Self::METHODS.contains(&method.as_str()) {
            warn!(target: "rpc", "widget called unknown method `{method}`");
            return PreparedCall::Ready(RpcResponse::new(id, RpcError::unknown_method(&method)));
        }

        match serde_json::from_value::<Self::Request>(req) {
            Ok(request) => match self.try_settle(request) {
                Ok(result) => {
                    trace!(target: "rpc", "sending rpc result {result:?}");
                    PreparedCall::Ready(RpcResponse::new(id, result))
                }
                Err(request) => PreparedCall::Pending(PendingCall { id, method, request }),
            },
            Err(err) => {
                let msg = err.to_string();
                warn!(target: "rpc", "failed to deserialize method `{method}`: {msg}");
                PreparedCall::Ready(RpcResponse::new(id, RpcError::invalid_params(msg)))
            }
        }
    }

    /// Runs an accepted [`RpcRequest`] to completion
    async fn on_call(&self, call: RpcRequest) -> RpcResponse {
        handle_call(self, call, None).await
    }
}

#[async_trait::async_trait]
impl RpcHandler for WalletApi {
    type Request = WidgetRequest;

    const METHODS: &'static [&'static str] = &WidgetRequest::METHODS;

    fn try_settle(&self, request: Self::Request) -> Result<ResponseResult, Self::Request> {
        self.try_execute(request)
    }

    async fn on_request(&self, request: Self::Request) -> ResponseResult {
        self.execute(request).await
    }
}

/// Runs the call through `handler`, bounding the awaited part by `timeout`.
pub async fn handle_call<Handler: RpcHandler>(
    handler: &Handler,
    call: RpcRequest,
    timeout: Option<Duration>,
) -> RpcResponse {
    match handler.prepare(call) {
        PreparedCall::Ready(response) => response,
        PreparedCall::Pending(pending) => pending.settle(handler, timeout).await,
    }
}
