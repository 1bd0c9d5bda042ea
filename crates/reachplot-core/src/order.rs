//! Cluster order: the append-only output sequence of an OPTICS run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ObjectId;

/// One entry of a [`ClusterOrder`].
///
/// Entries are stored in *visitation* order. The reachability of the first
/// entry of every connected run is `f64::INFINITY`, and such entries carry
/// no predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    /// The object visited at this position.
    pub id: ObjectId,

    /// Reachability distance assigned when the object was emitted.
    pub reachability: f64,

    /// The object this one was reached from (None at run starts).
    pub predecessor: Option<ObjectId>,
}

/// The cluster order produced by an OPTICS expansion.
///
/// An append-only sequence of `(id, reachability, predecessor)` entries,
/// one per processed object, stored by visitation order - *not* sorted by
/// reachability. Created empty at the start of a run, grown monotonically
/// via [`push`](ClusterOrder::push), and immutable once the run completes.
///
/// # Example
///
/// ```
/// use reachplot_core::{ClusterOrder, ObjectId};
///
/// let mut order = ClusterOrder::with_capacity(2);
/// order.push(ObjectId(4), f64::INFINITY, None);
/// order.push(ObjectId(1), 0.5, Some(ObjectId(4)));
///
/// assert_eq!(order.len(), 2);
/// assert_eq!(order.reachability_of(ObjectId(1)), Some(0.5));
/// assert_eq!(order.predecessor_of(ObjectId(1)), Some(ObjectId(4)));
/// assert_eq!(order.predecessor_of(ObjectId(4)), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<OrderEntry>", into = "Vec<OrderEntry>")]
pub struct ClusterOrder {
    entries: Vec<OrderEntry>,
    /// Position of each id in `entries`.
    positions: HashMap<ObjectId, usize>,
}

impl ClusterOrder {
    /// Create an empty cluster order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cluster order with room for `n` entries.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
            positions: HashMap::with_capacity(n),
        }
    }

    /// Append one entry.
    ///
    /// # Panics
    ///
    /// Panics if `id` was already added. Re-adding an id is a caller bug
    /// (a fatal precondition violation, not a recoverable error) and must
    /// abort the run rather than silently continue.
    pub fn push(&mut self, id: ObjectId, reachability: f64, predecessor: Option<ObjectId>) {
        let previous = self.positions.insert(id, self.entries.len());
        assert!(
            previous.is_none(),
            "object {id} appended to cluster order twice"
        );
        self.entries.push(OrderEntry {
            id,
            reachability,
            predecessor,
        });
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the order holds no entries yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at position `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&OrderEntry> {
        self.entries.get(index)
    }

    /// Iterate entries in visitation order.
    pub fn iter(&self) -> impl Iterator<Item = &OrderEntry> {
        self.entries.iter()
    }

    /// The ids in visitation order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// The reachability values in visitation order (the reachability plot).
    pub fn reachabilities(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.reachability)
    }

    /// Position of `id` in the order, if it was visited.
    #[inline]
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Reachability assigned to `id`, if it was visited.
    pub fn reachability_of(&self, id: ObjectId) -> Option<f64> {
        self.index_of(id).map(|i| self.entries[i].reachability)
    }

    /// Predecessor of `id`. None if `id` started a run (or was never
    /// visited).
    pub fn predecessor_of(&self, id: ObjectId) -> Option<ObjectId> {
        self.index_of(id).and_then(|i| self.entries[i].predecessor)
    }

    /// Re-emit `subset` filtered to visited ids, in cluster-order sequence.
    ///
    /// Used by callers that need a restricted ordering, e.g. plotting only
    /// one cluster's section of the reachability plot.
    pub fn order(&self, subset: &[ObjectId]) -> Vec<ObjectId> {
        let mut indices: Vec<usize> = subset.iter().filter_map(|&id| self.index_of(id)).collect();
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|i| self.entries[i].id).collect()
    }
}

impl From<Vec<OrderEntry>> for ClusterOrder {
    fn from(entries: Vec<OrderEntry>) -> Self {
        let positions = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id, i))
            .collect();
        Self { entries, positions }
    }
}

impl From<ClusterOrder> for Vec<OrderEntry> {
    fn from(order: ClusterOrder) -> Self {
        order.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> ClusterOrder {
        let mut order = ClusterOrder::new();
        order.push(ObjectId(5), f64::INFINITY, None);
        order.push(ObjectId(2), 1.5, Some(ObjectId(5)));
        order.push(ObjectId(9), 2.0, Some(ObjectId(2)));
        order
    }

    // =========================================================================
    // APPEND / LOOKUP TESTS
    // =========================================================================

    #[test]
    fn test_push_and_lookup() {
        let order = sample_order();

        assert_eq!(order.len(), 3);
        assert!(!order.is_empty());
        assert_eq!(order.index_of(ObjectId(9)), Some(2));
        assert_eq!(order.index_of(ObjectId(0)), None);
        assert_eq!(order.reachability_of(ObjectId(2)), Some(1.5));
        assert_eq!(order.predecessor_of(ObjectId(9)), Some(ObjectId(2)));
        assert_eq!(order.predecessor_of(ObjectId(5)), None, "run start");

        println!("[PASS] test_push_and_lookup - len={}", order.len());
    }

    #[test]
    fn test_first_entry_is_run_start() {
        let order = sample_order();
        let first = order.get(0).expect("order is non-empty");
        assert!(first.reachability.is_infinite());
        assert!(first.predecessor.is_none());

        println!("[PASS] test_first_entry_is_run_start");
    }

    #[test]
    #[should_panic(expected = "appended to cluster order twice")]
    fn test_duplicate_push_panics() {
        let mut order = sample_order();
        order.push(ObjectId(5), 0.1, None);
    }

    // =========================================================================
    // SUBSET ORDERING TESTS
    // =========================================================================

    #[test]
    fn test_order_subset_follows_visitation_sequence() {
        let order = sample_order();

        // Subset given out of sequence, with an unknown id mixed in.
        let subset = vec![ObjectId(9), ObjectId(77), ObjectId(5)];
        let reordered = order.order(&subset);
        assert_eq!(reordered, vec![ObjectId(5), ObjectId(9)]);

        println!("[PASS] test_order_subset_follows_visitation_sequence");
    }

    #[test]
    fn test_order_subset_deduplicates() {
        let order = sample_order();
        let reordered = order.order(&[ObjectId(2), ObjectId(2)]);
        assert_eq!(reordered, vec![ObjectId(2)]);

        println!("[PASS] test_order_subset_deduplicates");
    }

    // =========================================================================
    // SERDE TESTS
    // =========================================================================

    #[test]
    fn test_serde_roundtrip_rebuilds_positions() {
        // serde_json cannot represent infinities, so round-trip a finite
        // tail slice of entries.
        let mut order = ClusterOrder::new();
        order.push(ObjectId(1), 3.0, None);
        order.push(ObjectId(4), 0.25, Some(ObjectId(1)));

        let json = serde_json::to_string(&order).expect("serialize must succeed");
        let restored: ClusterOrder = serde_json::from_str(&json).expect("deserialize must succeed");

        assert_eq!(restored, order);
        assert_eq!(restored.index_of(ObjectId(4)), Some(1));

        println!("[PASS] test_serde_roundtrip_rebuilds_positions - json={}", json);
    }
}
