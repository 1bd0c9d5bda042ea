//! FastOPTICS: approximate cluster ordering over projected neighborhoods.

use tracing::debug;

use crate::error::{OpticsError, OpticsResult};
use crate::oracle::ProjectedNeighborhoods;
use crate::order::ClusterOrder;
use crate::types::ObjectId;

use super::{expand, HeapFrontier, Neighborhood, NeighborhoodSource};

/// Approximate OPTICS engine over precomputed neighborhoods.
///
/// Reuses the heap-expansion skeleton of
/// [`OpticsClusterer`](crate::OpticsClusterer) but swaps the density
/// source: neighbor sets
/// come precomputed from an upstream random-projection index, and the
/// per-point inverse density is used directly as the core distance - no
/// range query, no k-th-neighbor computation.
///
/// Because the neighbor sets are approximate and fixed in advance, a point
/// may have zero eligible neighbors; it is emitted with whatever
/// reachability the queue assigned it and expands nothing further.
///
/// # Example
///
/// ```
/// use reachplot_core::oracle::{FixedNeighborhoods, Neighbor};
/// use reachplot_core::{FastOpticsClusterer, ObjectId};
///
/// let mut table = FixedNeighborhoods::new();
/// table.insert(ObjectId(0), vec![Neighbor { id: ObjectId(1), distance: 1.0 }], 0.5);
/// table.insert(ObjectId(1), vec![Neighbor { id: ObjectId(0), distance: 1.0 }], 0.5);
///
/// let order = FastOpticsClusterer::new()
///     .cluster_order(&table, &[ObjectId(0), ObjectId(1)])
///     .unwrap();
/// assert_eq!(order.len(), 2);
/// assert_eq!(order.reachability_of(ObjectId(1)), Some(1.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FastOpticsClusterer;

impl FastOpticsClusterer {
    /// Create a FastOPTICS clusterer.
    pub fn new() -> Self {
        Self
    }

    /// Build the approximate cluster order for `ids`.
    ///
    /// # Errors
    ///
    /// Returns `OpticsError::EmptyDataset` if `ids` is empty.
    pub fn cluster_order<P: ProjectedNeighborhoods>(
        &self,
        source: &P,
        ids: &[ObjectId],
    ) -> OpticsResult<ClusterOrder> {
        if ids.is_empty() {
            return Err(OpticsError::EmptyDataset);
        }
        debug!(n = ids.len(), "building approximate cluster order");

        let source = ProjectedSource { inner: source };
        Ok(expand(&source, ids, &mut HeapFrontier::new()))
    }
}

/// [`NeighborhoodSource`] adapter over a [`ProjectedNeighborhoods`] service.
struct ProjectedSource<'a, P: ProjectedNeighborhoods> {
    inner: &'a P,
}

impl<P: ProjectedNeighborhoods> NeighborhoodSource for ProjectedSource<'_, P> {
    fn neighborhood(&self, id: ObjectId) -> Neighborhood {
        Neighborhood {
            core_distance: Some(self.inner.inverse_density(id)),
            neighbors: self.inner.neighbors(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{FixedNeighborhoods, Neighbor};

    fn neighbor(id: u64, distance: f64) -> Neighbor {
        Neighbor {
            id: ObjectId(id),
            distance,
        }
    }

    fn chain_table() -> FixedNeighborhoods {
        // 0 - 1 - 2 chained, 3 isolated (empty neighbor set).
        let mut table = FixedNeighborhoods::new();
        table.insert(ObjectId(0), vec![neighbor(1, 1.0)], 0.5);
        table.insert(ObjectId(1), vec![neighbor(0, 1.0), neighbor(2, 2.0)], 0.75);
        table.insert(ObjectId(2), vec![neighbor(1, 2.0)], 1.0);
        table.insert(ObjectId(3), vec![], 4.0);
        table
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = FastOpticsClusterer::new()
            .cluster_order(&chain_table(), &[])
            .unwrap_err();
        assert!(matches!(err, OpticsError::EmptyDataset));

        println!("[PASS] test_empty_dataset_rejected");
    }

    #[test]
    fn test_inverse_density_acts_as_core_distance() {
        let ids = ObjectId::dense(4);
        let order = FastOpticsClusterer::new()
            .cluster_order(&chain_table(), &ids)
            .unwrap();

        // 1 reached from 0: max(dist 1.0, inv_density(0) 0.5) = 1.0
        // 2 reached from 1: max(dist 2.0, inv_density(1) 0.75) = 2.0
        assert_eq!(order.reachability_of(ObjectId(1)), Some(1.0));
        assert_eq!(order.predecessor_of(ObjectId(1)), Some(ObjectId(0)));
        assert_eq!(order.reachability_of(ObjectId(2)), Some(2.0));

        println!("[PASS] test_inverse_density_acts_as_core_distance");
    }

    #[test]
    fn test_isolated_point_restarts_and_expands_nothing() {
        let ids = ObjectId::dense(4);
        let order = FastOpticsClusterer::new()
            .cluster_order(&chain_table(), &ids)
            .unwrap();

        assert_eq!(order.len(), 4);
        assert_eq!(order.reachability_of(ObjectId(3)), Some(f64::INFINITY));
        assert_eq!(order.predecessor_of(ObjectId(3)), None);

        println!("[PASS] test_isolated_point_restarts_and_expands_nothing");
    }

    #[test]
    fn test_asymmetric_neighborhoods_still_complete() {
        // 0 lists 1, but 1 lists nobody back. Every id must still appear.
        let mut table = FixedNeighborhoods::new();
        table.insert(ObjectId(0), vec![neighbor(1, 1.5)], 1.0);
        table.insert(ObjectId(1), vec![], 1.0);

        let order = FastOpticsClusterer::new()
            .cluster_order(&table, &[ObjectId(0), ObjectId(1)])
            .unwrap();

        assert_eq!(order.len(), 2);
        assert_eq!(order.reachability_of(ObjectId(1)), Some(1.5));

        println!("[PASS] test_asymmetric_neighborhoods_still_complete");
    }
}
