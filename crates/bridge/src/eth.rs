//! The closed set of methods a widget may call

use crate::serde_helpers::{empty_params, sequence};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter object of `wallet_switchEthereumChain`, see [EIP-3326](https://eips.ethereum.org/EIPS/eip-3326)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainParams {
    /// The target chain as a `0x`-prefixed hex quantity
    pub chain_id: String,
}

/// A transaction as described by the widget.
///
/// The bridge does not look inside, the [`TransactionSender`](crate::signer::TransactionSender)
/// decides what fields it understands.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionDescriptor(pub Map<String, Value>);

impl TransactionDescriptor {
    /// Returns the value of a field of the transaction.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// Represents all methods the bridge answers
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum WidgetRequest {
    #[serde(rename = "eth_accounts", with = "empty_params")]
    EthAccounts(()),

    #[serde(rename = "eth_chainId", with = "empty_params")]
    EthChainId(()),

    #[serde(rename = "wallet_switchEthereumChain", with = "sequence")]
    SwitchChain(SwitchChainParams),

    #[serde(rename = "eth_sendTransaction", with = "sequence")]
    EthSendTransaction(Box<TransactionDescriptor>),

    #[serde(rename = "eth_estimateGas", with = "sequence")]
    EthEstimateGas(Box<TransactionDescriptor>),
}

impl WidgetRequest {
    /// Names of all methods, in declaration order.
    pub const METHODS: [&'static str; 5] = [
        "eth_accounts",
        "eth_chainId",
        "wallet_switchEthereumChain",
        "eth_sendTransaction",
        "eth_estimateGas",
    ];

    /// Returns the wire name of the method.
    pub const fn method(&self) -> &'static str {
        match self {
            Self::EthAccounts(_) => "eth_accounts",
            Self::EthChainId(_) => "eth_chainId",
            Self::SwitchChain(_) => "wallet_switchEthereumChain",
            Self::EthSendTransaction(_) => "eth_sendTransaction",
            Self::EthEstimateGas(_) => "eth_estimateGas",
        }
    }
}
