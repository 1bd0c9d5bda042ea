//! Cluster forest produced by Xi extraction.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::ClusterOrder;
use crate::types::ObjectId;

/// One extracted cluster.
///
/// Holds the ids this cluster claimed *directly* (nested clusters are
/// disjoint sets of ids, even though their index ranges nest) plus the
/// `[start, end]` span into the cluster order used for containment tests
/// while the hierarchy is assembled. Links are indices into the owning
/// [`Clustering`] arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Directly claimed member ids, in cluster-order sequence.
    pub ids: Vec<ObjectId>,

    /// First cluster-order index covered by this cluster.
    pub start: usize,

    /// Last cluster-order index covered by this cluster (inclusive).
    pub end: usize,

    /// Parent cluster index (None for roots).
    pub parent: Option<usize>,

    /// Child cluster indices, in discovery order.
    pub children: Vec<usize>,

    /// Whether this is the synthetic trailing noise cluster.
    pub is_noise: bool,
}

impl Cluster {
    /// Number of directly claimed members.
    #[inline]
    pub fn member_count(&self) -> usize {
        self.ids.len()
    }

    /// Whether this cluster has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether `other`'s index range is contained in this cluster's range.
    #[inline]
    pub fn contains_range(&self, other: &Cluster) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// The forest of clusters extracted from one cluster order.
///
/// Clusters live in an arena; parent/child links are arena indices.
/// Reparenting happens only during extraction - a finished `Clustering`
/// is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    clusters: Vec<Cluster>,
    roots: Vec<usize>,
    /// When the extraction ran.
    pub extracted_at: DateTime<Utc>,
}

impl Clustering {
    /// Number of clusters in the forest.
    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the forest holds no clusters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Cluster at arena index `idx`, if any.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Cluster> {
        self.clusters.get(idx)
    }

    /// Arena indices of the top-level clusters.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Iterate all clusters with their arena indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Cluster)> {
        self.clusters.iter().enumerate()
    }

    /// Arena indices of the leaf clusters.
    pub fn leaves(&self) -> Vec<usize> {
        self.clusters
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_leaf())
            .map(|(i, _)| i)
            .collect()
    }

    /// Total directly-claimed members across all clusters.
    ///
    /// Clusters claim disjoint id sets, so this equals the size of the
    /// extracted dataset.
    pub fn total_members(&self) -> usize {
        self.clusters.iter().map(Cluster::member_count).sum()
    }

    /// Whether cluster `idx` directly claims `id`.
    pub fn contains(&self, idx: usize, id: ObjectId) -> bool {
        self.clusters
            .get(idx)
            .is_some_and(|c| c.ids.contains(&id))
    }
}

// =============================================================================
// HierarchyBuilder
// =============================================================================

/// Mutable assembly state for the cluster forest.
///
/// Tracks which ids are still unclaimed and which clusters are currently
/// top-level. Discovering an enclosing cluster reparents every open
/// cluster whose index range it contains; the open list is rebuilt per
/// step rather than mutated while iterated.
#[derive(Debug)]
pub(crate) struct HierarchyBuilder {
    clusters: Vec<Cluster>,
    open: Vec<usize>,
    unclaimed: HashSet<ObjectId>,
}

impl HierarchyBuilder {
    pub fn new(order: &ClusterOrder) -> Self {
        Self {
            clusters: Vec::new(),
            open: Vec::new(),
            unclaimed: order.ids().collect(),
        }
    }

    /// Add a cluster spanning `[start, end]` of `order`, claiming every id
    /// in the span not already claimed by a nested cluster, and adopting
    /// every open cluster whose range the span contains.
    pub fn add_cluster(&mut self, order: &ClusterOrder, start: usize, end: usize) {
        debug_assert!(end < order.len(), "cluster span exceeds the order");
        let mut ids = Vec::new();
        for entry in (start..=end).filter_map(|i| order.get(i)) {
            if self.unclaimed.remove(&entry.id) {
                ids.push(entry.id);
            }
        }

        let idx = self.clusters.len();
        self.clusters.push(Cluster {
            ids,
            start,
            end,
            parent: None,
            children: Vec::new(),
            is_noise: false,
        });

        let mut still_open = Vec::with_capacity(self.open.len() + 1);
        for &other in &self.open {
            if self.clusters[idx].contains_range(&self.clusters[other]) {
                self.clusters[other].parent = Some(idx);
                self.clusters[idx].children.push(other);
            } else {
                still_open.push(other);
            }
        }
        still_open.push(idx);
        self.open = still_open;
    }

    /// Close the forest: leftover ids become one final remainder cluster
    /// (flagged noise when the order's last reachability is infinite)
    /// parenting all open clusters; with nothing left over, the open
    /// clusters become the roots directly.
    pub fn finish(mut self, order: &ClusterOrder) -> Clustering {
        let roots = if self.unclaimed.is_empty() {
            self.open
        } else {
            let ids: Vec<ObjectId> = order
                .ids()
                .filter(|id| self.unclaimed.contains(id))
                .collect();
            let is_noise = order
                .get(order.len() - 1)
                .is_some_and(|e| e.reachability.is_infinite());

            let idx = self.clusters.len();
            self.clusters.push(Cluster {
                ids,
                start: 0,
                end: order.len().saturating_sub(1),
                parent: None,
                children: Vec::new(),
                is_noise,
            });
            for &other in &self.open {
                self.clusters[other].parent = Some(idx);
                self.clusters[idx].children.push(other);
            }
            vec![idx]
        };

        Clustering {
            clusters: self.clusters,
            roots,
            extracted_at: Utc::now(),
        }
    }
}
