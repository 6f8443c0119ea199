//! Cart reconciliation triggers.
//!
//! The client-observed cart is reconciled against the server
//! opportunistically. Every trigger means the same thing: the snapshot
//! may be stale, refetch it. The fresh snapshot is then merged under any
//! still-pending optimistic state by the tracker overlay, so a refetch
//! can never clobber a newer pending intent.

use serde::{Deserialize, Serialize};

/// A soft invalidation trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Invalidation {
    /// Cart view mounted.
    Mount,
    /// Window regained focus.
    Refocus,
    /// Network connection restored.
    Reconnect,
    /// Fixed polling interval elapsed.
    PollTick,
}

impl Invalidation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Invalidation::Mount => "mount",
            Invalidation::Refocus => "refocus",
            Invalidation::Reconnect => "reconnect",
            Invalidation::PollTick => "poll_tick",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimistic::MutationTracker;
    use bookstall_commerce::cart::CartLine;
    use bookstall_commerce::ids::{BookId, LineId, UserId};
    use bookstall_commerce::Money;

    fn line(id: &str, quantity: i64) -> CartLine {
        let mut l = CartLine::new(
            UserId::new("u1"),
            BookId::new("b1"),
            quantity,
            Money::new(20_000),
            "A Book",
        )
        .unwrap();
        l.id = LineId::new(id);
        l
    }

    #[test]
    fn test_refetch_merges_under_pending_intent() {
        let mut tracker = MutationTracker::new();
        let l = line("a", 2);
        tracker.submit_quantity(&l.id, 5);

        // A refetch lands carrying the old canonical quantity. The
        // pending intent must survive the merge.
        let refetched = vec![line("a", 2)];
        let shown = tracker.overlay(&refetched);
        assert_eq!(shown[0].quantity, 5);
    }

    #[test]
    fn test_refetch_applies_cleanly_once_settled() {
        let mut tracker = MutationTracker::new();
        let l = line("a", 2);
        let seq = tracker.submit_quantity(&l.id, 5);
        tracker.settle_success(&l.id, seq);

        let refetched = vec![line("a", 5)];
        let shown = tracker.overlay(&refetched);
        assert_eq!(shown[0].quantity, 5);
        assert!(!tracker.has_pending());
    }
}
