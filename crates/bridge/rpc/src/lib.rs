//! Wire types exchanged between an embedded widget and the wallet bridge of its host.
//!
//! Requests are flat `{ "id", "method", "params"? }` objects, responses use a single
//! `success`-tagged envelope. See [`request::RpcRequest`] and [`response::RpcResponse`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// JSON-RPC error codes and the error value carried by failure responses
pub mod error;

/// Inbound request type
pub mod request;

/// Outbound response envelope
pub mod response;
