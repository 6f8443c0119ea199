//! Checkout handoff tokens.
//!
//! A handoff carries a selected subset of cart lines into the checkout
//! context. Tokens are single-use: consuming one invalidates it, so a
//! page reload after checkout cannot replay stale line data.

use std::collections::HashMap;
use std::fmt;

use bookstall_commerce::cart::CartLine;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Single-use carrier of a cart selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandoffToken(String);

impl HandoffToken {
    fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("handoff-{:x}-{:x}", timestamp as u64, counter))
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandoffToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keyed store of pending handoffs.
#[derive(Debug, Default)]
pub struct HandoffStore {
    slots: HashMap<HandoffToken, Vec<CartLine>>,
}

impl HandoffStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a selection under a fresh token.
    pub fn handoff(&mut self, lines: Vec<CartLine>) -> HandoffToken {
        let token = HandoffToken::generate();
        self.slots.insert(token.clone(), lines);
        token
    }

    /// Consume a token, returning its snapshot exactly once.
    pub fn consume(&mut self, token: &HandoffToken) -> Result<Vec<CartLine>, ClientError> {
        self.slots
            .remove(token)
            .ok_or(ClientError::HandoffNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstall_commerce::ids::{BookId, UserId};
    use bookstall_commerce::Money;

    fn line() -> CartLine {
        CartLine::new(
            UserId::new("u1"),
            BookId::new("b1"),
            2,
            Money::new(20_000),
            "A Book",
        )
        .unwrap()
    }

    #[test]
    fn test_consume_returns_snapshot_once() {
        let mut store = HandoffStore::new();
        let token = store.handoff(vec![line()]);

        let snapshot = store.consume(&token).unwrap();
        assert_eq!(snapshot.len(), 1);

        // Second consume must not replay
        assert_eq!(
            store.consume(&token).unwrap_err(),
            ClientError::HandoffNotFound
        );
    }

    #[test]
    fn test_unknown_token_is_not_found() {
        let mut store = HandoffStore::new();
        let token = store.handoff(vec![line()]);
        store.consume(&token).unwrap();

        let mut other = HandoffStore::new();
        assert!(other.consume(&token).is_err());
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut store = HandoffStore::new();
        let a = store.handoff(vec![]);
        let b = store.handoff(vec![]);
        assert_ne!(a, b);
    }
}
