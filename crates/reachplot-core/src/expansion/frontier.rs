//! Candidate frontiers: the two interchangeable "next point" structures.
//!
//! Both frontiers answer the same question - which unprocessed candidate
//! has the smallest `(reachability, id)` - and must agree on every answer,
//! so the heap and list expansions produce identical cluster orders.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::types::ObjectId;

/// A pending candidate held by a frontier.
///
/// Ordering is ascending `(reachability, id)`; the predecessor does not
/// participate in comparisons. Identity for update purposes is the id
/// alone: two entries for the same id are the same slot, and only the one
/// with the smallest reachability may be emitted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CandidateEntry {
    pub id: ObjectId,
    pub predecessor: ObjectId,
    pub reachability: f64,
}

impl PartialEq for CandidateEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CandidateEntry {}

impl PartialOrd for CandidateEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reachability is never NaN here; total_cmp keeps the comparison total.
        self.reachability
            .total_cmp(&other.reachability)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// The candidate structure a cluster-order expansion runs against.
pub(crate) trait Frontier {
    /// Record that `id` is reachable from `predecessor` at `reachability`.
    /// Offers that do not improve on the best known reachability for `id`
    /// are ignored.
    fn offer(&mut self, id: ObjectId, predecessor: ObjectId, reachability: f64);

    /// Remove and return the minimum `(reachability, id)` candidate.
    fn pop_min(&mut self) -> Option<CandidateEntry>;
}

// =============================================================================
// HeapFrontier
// =============================================================================

/// Binary min-heap frontier with lazy decrease-key.
///
/// An improved offer pushes a fresh entry instead of updating in place;
/// the stale, worse entry stays behind and is discarded when it finally
/// surfaces (its id is processed by then). The `best` map rejects
/// non-improving offers so the entries pushed for one id form a strictly
/// decreasing reachability sequence.
#[derive(Debug, Default)]
pub(crate) struct HeapFrontier {
    heap: BinaryHeap<Reverse<CandidateEntry>>,
    best: HashMap<ObjectId, f64>,
}

impl HeapFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for HeapFrontier {
    fn offer(&mut self, id: ObjectId, predecessor: ObjectId, reachability: f64) {
        let best = self.best.entry(id).or_insert(f64::INFINITY);
        if reachability < *best {
            *best = reachability;
            self.heap.push(Reverse(CandidateEntry {
                id,
                predecessor,
                reachability,
            }));
        }
    }

    fn pop_min(&mut self) -> Option<CandidateEntry> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }
}

// =============================================================================
// ListFrontier
// =============================================================================

/// Unsorted-array frontier with linear-scan extraction.
///
/// Reachability and predecessor live in two parallel maps updated in
/// place; an id enters `candidates` the first time its reachability drops
/// below infinity and leaves by swap-with-last when extracted. Trades the
/// heap's O(log n) pushes for an O(|candidates|) scan per step.
#[derive(Debug, Default)]
pub(crate) struct ListFrontier {
    candidates: Vec<ObjectId>,
    reachability: HashMap<ObjectId, f64>,
    predecessor: HashMap<ObjectId, ObjectId>,
}

impl ListFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for ListFrontier {
    fn offer(&mut self, id: ObjectId, predecessor: ObjectId, reachability: f64) {
        let current = self.reachability.entry(id).or_insert(f64::INFINITY);
        if reachability < *current {
            if current.is_infinite() {
                self.candidates.push(id);
            }
            *current = reachability;
            self.predecessor.insert(id, predecessor);
        }
    }

    fn pop_min(&mut self) -> Option<CandidateEntry> {
        if self.candidates.is_empty() {
            return None;
        }
        let mut min_pos = 0;
        for pos in 1..self.candidates.len() {
            let challenger = self.candidates[pos];
            let incumbent = self.candidates[min_pos];
            let challenger_reach = self.reachability[&challenger];
            let incumbent_reach = self.reachability[&incumbent];
            if challenger_reach
                .total_cmp(&incumbent_reach)
                .then_with(|| challenger.cmp(&incumbent))
                == Ordering::Less
            {
                min_pos = pos;
            }
        }
        let id = self.candidates.swap_remove(min_pos);
        Some(CandidateEntry {
            id,
            predecessor: self.predecessor[&id],
            reachability: self.reachability[&id],
        })
    }
}
