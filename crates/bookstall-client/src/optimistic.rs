//! Optimistic mutation tracking.
//!
//! Each cart line is in exactly one of three states: stable, pending a
//! quantity update, or pending removal. The pending state is a single
//! tagged value per line, never a parallel array, so the displayed view
//! cannot desynchronize from the canonical snapshot.
//!
//! Race policy is last-submission-wins: a second mutation on a line
//! overwrites the pending intent rather than queueing behind it, and
//! settlements are matched by submission sequence so a superseded call
//! resolving late cannot disturb the newer intent. The canonical value
//! is whatever the server ends up with; the next refetch reconciles it.

use std::collections::HashMap;

use bookstall_commerce::cart::CartLine;
use bookstall_commerce::ids::LineId;
use tracing::{debug, warn};

/// What a pending mutation intends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    /// Change the quantity to the target.
    Update { target_qty: i64 },
    /// Remove the line; it is hidden from display while in flight.
    Removal,
}

/// An unconfirmed mutation layered over one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    /// The intent.
    pub kind: PendingKind,
    /// Submission sequence, monotone across the tracker.
    pub seq: u64,
    /// Unix timestamp of submission.
    pub submitted_at: i64,
}

/// Outcome of settling a server call against the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The call matched the current intent; pending state cleared.
    Cleared,
    /// The call was superseded by a newer submission; ignored.
    Stale,
}

/// Per-line optimistic state, keyed one pending mutation per line.
#[derive(Debug, Default)]
pub struct MutationTracker {
    pending: HashMap<LineId, PendingMutation>,
    next_seq: u64,
}

impl MutationTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a quantity-change intent, overwriting any pending intent
    /// on the same line. Returns the submission sequence to settle with.
    pub fn submit_quantity(&mut self, line: &LineId, target_qty: i64) -> u64 {
        self.submit(line, PendingKind::Update { target_qty })
    }

    /// Record a removal intent, overwriting any pending intent on the
    /// same line.
    pub fn submit_removal(&mut self, line: &LineId) -> u64 {
        self.submit(line, PendingKind::Removal)
    }

    fn submit(&mut self, line: &LineId, kind: PendingKind) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let replaced = self.pending.insert(
            line.clone(),
            PendingMutation {
                kind,
                seq,
                submitted_at: current_timestamp(),
            },
        );
        if replaced.is_some() {
            debug!(%line, seq, "pending intent overwritten by newer submission");
        }
        seq
    }

    /// Settle a successful server call.
    ///
    /// Only the call for the currently pending sequence clears the
    /// state; anything older was superseded and is dropped.
    pub fn settle_success(&mut self, line: &LineId, seq: u64) -> Settlement {
        let current = self.pending.get(line).is_some_and(|p| p.seq == seq);
        if current {
            self.pending.remove(line);
            Settlement::Cleared
        } else {
            warn!(%line, seq, "dropping settlement for superseded submission");
            Settlement::Stale
        }
    }

    /// Settle a failed server call.
    ///
    /// Clearing the pending state reverts the displayed value to the
    /// canonical snapshot quantity, which is exactly the value shown
    /// before the submission. No retry is attempted.
    pub fn settle_failure(&mut self, line: &LineId, seq: u64) -> Settlement {
        let current = self.pending.get(line).is_some_and(|p| p.seq == seq);
        if current {
            self.pending.remove(line);
            warn!(%line, seq, "mutation failed, optimistic state rolled back");
            Settlement::Cleared
        } else {
            Settlement::Stale
        }
    }

    /// The pending mutation on a line, if any.
    pub fn pending(&self, line: &LineId) -> Option<&PendingMutation> {
        self.pending.get(line)
    }

    /// Whether any mutation is in flight.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The quantity to display for a line, or `None` when the line is
    /// hidden by a pending removal.
    pub fn displayed_quantity(&self, line: &CartLine) -> Option<i64> {
        match self.pending.get(&line.id) {
            None => Some(line.quantity),
            Some(p) => match p.kind {
                PendingKind::Update { target_qty } => Some(target_qty),
                PendingKind::Removal => None,
            },
        }
    }

    /// Overlay pending intents onto a canonical snapshot.
    ///
    /// Lines pending removal are omitted; lines pending an update carry
    /// the target quantity. A refetched snapshot passed through here can
    /// never clobber a pending intent, however stale the fetch.
    pub fn overlay(&self, lines: &[CartLine]) -> Vec<CartLine> {
        lines
            .iter()
            .filter_map(|line| {
                self.displayed_quantity(line).map(|quantity| {
                    let mut shown = line.clone();
                    shown.quantity = quantity;
                    shown
                })
            })
            .collect()
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
