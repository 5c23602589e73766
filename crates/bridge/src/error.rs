//! Aggregated error types for the bridge

use crate::transport::WindowId;
use serde::Serialize;
use widget_rpc::{error::RpcError, response::ResponseResult};

pub type Result<T, E = WalletError> = std::result::Result<T, E>;

/// Errors produced by the wallet handlers
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("invalid chain id `{value}`: {reason}")]
    InvalidChainId { value: String, reason: String },
    #[error(transparent)]
    Signer(#[from] SignerError),
}

/// Errors reported by a [`TransactionSender`](crate::signer::TransactionSender)
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("Method: {0} is not implemented.")]
    NotImplemented(&'static str),
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Other(String),
}

/// Errors of the cross-window transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("target window {0} is not available")]
    WindowUnavailable(WindowId),
    #[error("transport has been disposed")]
    Disposed,
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors while loading the [`BridgeConfig`](crate::config::BridgeConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load bridge config: {0}")]
    Figment(#[from] figment::Error),
}

/// Helper trait to easily convert results to rpc results
pub(crate) trait ToRpcResponseResult {
    fn to_rpc_result(self) -> ResponseResult;
}

/// Converts a serializable value into a `ResponseResult`
pub fn to_rpc_result<T: Serialize>(val: T) -> ResponseResult {
    match serde_json::to_value(val) {
        Ok(success) => ResponseResult::Success(success),
        Err(err) => {
            error!(target: "rpc", "Failed serialize rpc response: {:?}", err);
            ResponseResult::error(RpcError::internal_error())
        }
    }
}

impl<T: Serialize> ToRpcResponseResult for Result<T> {
    fn to_rpc_result(self) -> ResponseResult {
        match self {
            Ok(val) => to_rpc_result(val),
            Err(err) => {
                let msg = err.to_string();
                let err = match err {
                    WalletError::InvalidChainId { .. } => RpcError::invalid_params(msg),
                    WalletError::Signer(err) => match err {
                        SignerError::NotImplemented(_) => RpcError::not_implemented(msg),
                        SignerError::Rejected(_) => RpcError::transaction_rejected(msg),
                        SignerError::Other(_) => {
                            error!(target: "rpc", "signer error: {}", msg);
                            RpcError::internal_error_with(msg)
                        }
                    },
                };
                ResponseResult::Error(err)
            }
        }
    }
}
