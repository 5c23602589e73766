//! Boundary to the signing machinery behind `eth_sendTransaction` and `eth_estimateGas`

use crate::{error::SignerError, eth::TransactionDescriptor, state::Session};
use alloy_primitives::{TxHash, U256};
use async_trait::async_trait;

/// Submits and prices transactions on behalf of the bridge.
///
/// Implementations receive the session as it was when the call was dispatched, so a chain switch
/// racing with a pending transaction does not change where it is sent.
#[async_trait]
pub trait TransactionSender: Send + Sync + 'static {
    /// Signs and broadcasts the transaction, returning its hash.
    async fn send_transaction(
        &self,
        tx: TransactionDescriptor,
        session: Session,
    ) -> Result<TxHash, SignerError>;

    /// Estimates the gas the transaction would use.
    async fn estimate_gas(
        &self,
        tx: TransactionDescriptor,
        session: Session,
    ) -> Result<U256, SignerError>;
}

/// A [`TransactionSender`] without a signing backend, every call fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedSender;

#[async_trait]
impl TransactionSender for UnimplementedSender {
    async fn send_transaction(
        &self,
        _tx: TransactionDescriptor,
        _session: Session,
    ) -> Result<TxHash, SignerError> {
        Err(SignerError::NotImplemented("eth_sendTransaction"))
    }

    async fn estimate_gas(
        &self,
        _tx: TransactionDescriptor,
        _session: Session,
    ) -> Result<U256, SignerError> {
        Err(SignerError::NotImplemented("eth_estimateGas"))
    }
}
