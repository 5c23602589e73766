//! Session state shared by all handlers of a bridge

use alloy_primitives::{Address, ChainId};
use parking_lot::RwLock;
use std::sync::Arc;

/// A copy of the session state at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Session {
    /// The single account exposed to the widget
    pub account: Address,
    /// The active chain
    pub chain_id: ChainId,
}

/// Handle to the mutable session of a bridge.
///
/// Cloning the handle shares the session. The account is fixed for the lifetime of the session,
/// the chain id is only written by the chain switch handler.
#[derive(Clone, Debug)]
pub struct SessionState {
    inner: Arc<RwLock<Session>>,
}

impl SessionState {
    /// Creates a new session seeded with the given account and chain.
    pub fn new(account: Address, chain_id: ChainId) -> Self {
        Self { inner: Arc::new(RwLock::new(Session { account, chain_id })) }
    }

    /// Returns the active account.
    pub fn account(&self) -> Address {
        self.inner.read().account
    }

    /// Returns the active chain id.
    pub fn chain_id(&self) -> ChainId {
        self.inner.read().chain_id
    }

    /// Returns a copy of the whole session.
    pub fn snapshot(&self) -> Session {
        *self.inner.read()
    }

    /// Replaces the active chain id and returns the previous one.
    pub(crate) fn set_chain_id(&self, chain_id: ChainId) -> ChainId {
        std::mem::replace(&mut self.inner.write().chain_id, chain_id)
    }
}

impl From<Session> for SessionState {
    fn from(session: Session) -> Self {
        Self::new(session.account, session.chain_id)
    }
}
