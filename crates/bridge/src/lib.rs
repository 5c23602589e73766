//! # widget-bridge
//!
//! Host side of the wallet bridge for embedded widgets.
//!
//! A widget running in another window posts `{ id, method, params }` messages on the host's
//! cross-window bus. The bridge picks out the ones coming from the window it is attached to,
//! resolves the method against a closed set of handlers that share one [`SessionState`], and
//! posts exactly one `{ id, success, data | error }` envelope back for each accepted request.
//!
//! ```text
//! widget ──post──▶ WindowHost ──▶ MessageValidator ──▶ RpcHandler (WalletApi) ──▶ SessionState
//!    ▲                                                        │
//!    └──────────────── TransportAdapter::post ◀── RpcResponse ┘
//! ```
//!
//! Supported methods: `eth_accounts`, `eth_chainId`, `wallet_switchEthereumChain`,
//! `eth_sendTransaction` and `eth_estimateGas`. The last two are forwarded to a
//! [`TransactionSender`], the default one refuses them.

#[macro_use]
extern crate tracing;

pub mod api;
pub mod bridge;
pub mod bus;
pub mod config;
pub mod error;
pub mod eth;
pub mod handler;
pub mod signer;
pub mod state;
pub mod transport;
pub mod validate;

mod serde_helpers;

pub use api::WalletApi;
pub use bridge::Bridge;
pub use bus::MessageBus;
pub use config::BridgeConfig;
pub use eth::WidgetRequest;
pub use handler::RpcHandler;
pub use signer::{TransactionSender, UnimplementedSender};
pub use state::{Session, SessionState};
pub use transport::{TransportAdapter, WindowHost, WindowId, WindowMessage};
pub use validate::MessageValidator;

pub use widget_rpc as rpc;
