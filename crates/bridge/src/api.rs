use crate::{
    config::BridgeConfig,
    error::{Result, ToRpcResponseResult, WalletError},
    eth::{SwitchChainParams, TransactionDescriptor, WidgetRequest},
    signer::{TransactionSender, UnimplementedSender},
    state::SessionState,
};
use alloy_primitives::{Address, ChainId, TxHash, U64, U256};
use std::sync::Arc;
use widget_rpc::response::ResponseResult;

/// The entry point for executing widget RPC calls.
///
/// This type is cheap to clone and can be used concurrently, all clones share the same session.
#[derive(Clone)]
pub struct WalletApi {
    /// Account and chain shared by all handlers
    state: SessionState,
    /// Where transactions are signed and sent
    sender: Arc<dyn TransactionSender>,
}

impl WalletApi {
    /// Creates a new instance
    pub fn new(state: SessionState, sender: Arc<dyn TransactionSender>) -> Self {
        Self { state, sender }
    }

    /// Creates a new instance seeded from the config, without a signing backend.
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(SessionState::new(config.account, config.chain_id), Arc::new(UnimplementedSender))
    }

    /// Replaces the transaction sender.
    pub fn with_sender(mut self, sender: Arc<dyn TransactionSender>) -> Self {
        self.sender = sender;
        self
    }

    /// Returns the shared session.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Executes the [WidgetRequest] and returns an RPC [ResponseResult].
    pub async fn execute(&self, request: WidgetRequest) -> ResponseResult {
        trace!(target: "rpc::api", method = request.method(), "executing widget request");
        match request {
            WidgetRequest::EthAccounts(()) => self.accounts().to_rpc_result(),
            WidgetRequest::EthChainId(()) => self.chain_id().to_rpc_result(),
            WidgetRequest::SwitchChain(params) => self.switch_chain(params).to_rpc_result(),
            WidgetRequest::EthSendTransaction(tx) => self.send_transaction(*tx).await.to_rpc_result(),
            WidgetRequest::EthEstimateGas(tx) => self.estimate_gas(*tx).await.to_rpc_result(),
        }
    }

    /// Executes the request in place if its handler never suspends, otherwise returns it.
    ///
    /// Session reads and the chain switch are answered here, so they observe each other in the
    /// order they were received. Signing requests are handed back for [`Self::execute`].
    pub fn try_execute(&self, request: WidgetRequest) -> Result<ResponseResult, WidgetRequest> {
        let result = match request {
            WidgetRequest::EthAccounts(()) => self.accounts().to_rpc_result(),
            WidgetRequest::EthChainId(()) => self.chain_id().to_rpc_result(),
            WidgetRequest::SwitchChain(params) => self.switch_chain(params).to_rpc_result(),
            request @ (WidgetRequest::EthSendTransaction(_) | WidgetRequest::EthEstimateGas(_)) => {
                return Err(request);
            }
        };
        Ok(result)
    }

    /// Returns the accounts exposed to the widget.
    ///
    /// Handler for ETH RPC call: `eth_accounts`
    pub fn accounts(&self) -> Result<Vec<Address>> {
        trace!(target: "rpc::api", "eth_accounts");
        Ok(vec![self.state.account()])
    }

    /// Returns the active chain id.
    ///
    /// Handler for ETH RPC call: `eth_chainId`
    pub fn chain_id(&self) -> Result<U64> {
        trace!(target: "rpc::api", "eth_chainId");
        Ok(U64::from(self.state.chain_id()))
    }

    /// Switches the active chain.
    ///
    /// The chain id is decoded and written before anything can interleave, an undecodable value
    /// leaves the session untouched.
    ///
    /// Handler for RPC call: `wallet_switchEthereumChain`
    pub fn switch_chain(&self, params: SwitchChainParams) -> Result<()> {
        trace!(target: "rpc::api", chain_id = %params.chain_id, "wallet_switchEthereumChain");
        let chain_id = parse_chain_id(&params.chain_id)?;
        let previous = self.state.set_chain_id(chain_id);
        if previous != chain_id {
            debug!(target: "rpc::api", previous, chain_id, "switched chain");
        }
        Ok(())
    }

    /// Signs and sends a transaction through the configured [TransactionSender].
    ///
    /// Handler for ETH RPC call: `eth_sendTransaction`
    pub async fn send_transaction(&self, tx: TransactionDescriptor) -> Result<TxHash> {
        trace!(target: "rpc::api", "eth_sendTransaction");
        let session = self.state.snapshot();
        let hash = self.sender.send_transaction(tx, session).await?;
        debug!(target: "rpc::api", %hash, "transaction sent");
        Ok(hash)
    }

    /// Estimates gas through the configured [TransactionSender].
    ///
    /// Handler for ETH RPC call: `eth_estimateGas`
    pub async fn estimate_gas(&self, tx: TransactionDescriptor) -> Result<U256> {
        trace!(target: "rpc::api", "eth_estimateGas");
        let session = self.state.snapshot();
        Ok(self.sender.estimate_gas(tx, session).await?)
    }
}

impl std::fmt::Debug for WalletApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletApi").field("state", &self.state).finish_non_exhaustive()
    }
}

/// Decodes a `0x`-prefixed hex quantity into a chain id.
fn parse_chain_id(value: &str) -> Result<ChainId> {
    let invalid = |reason: String| WalletError::InvalidChainId { value: value.to_string(), reason };
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| invalid("expected a 0x-prefixed hex quantity".to_string()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("invalid hex digits".to_string()));
    }
    ChainId::from_str_radix(digits, 16).map_err(|err| invalid(err.to_string()))
}
