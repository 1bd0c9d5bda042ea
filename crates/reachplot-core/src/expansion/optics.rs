//! Exact OPTICS clusterer over a range-query oracle.

use tracing::debug;

use crate::error::{OpticsError, OpticsResult};
use crate::oracle::NeighborOracle;
use crate::order::ClusterOrder;
use crate::types::ObjectId;

use super::{
    expand, ExpansionStrategy, HeapFrontier, ListFrontier, Neighborhood, NeighborhoodSource,
    OpticsParams,
};

/// Exact OPTICS cluster-ordering engine.
///
/// Queries a [`NeighborOracle`] within `epsilon` of each visited point,
/// derives core distances from the `min_pts`-th nearest neighbor, and
/// emits every point exactly once in reachability order. The heap and
/// list strategies are interchangeable and produce identical orders.
///
/// # Example
///
/// ```
/// use reachplot_core::oracle::BruteForceOracle;
/// use reachplot_core::{OpticsClusterer, OpticsParams};
///
/// let oracle = BruteForceOracle::new(vec![
///     vec![0.0], vec![0.5], vec![1.0], vec![10.0],
/// ]).unwrap();
///
/// let clusterer = OpticsClusterer::new(OpticsParams::default().with_min_pts(2)).unwrap();
/// let order = clusterer.cluster_order(&oracle, &oracle.ids()).unwrap();
/// assert_eq!(order.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct OpticsClusterer {
    params: OpticsParams,
    strategy: ExpansionStrategy,
}

impl OpticsClusterer {
    /// Create a clusterer with validated params and the default (heap)
    /// strategy.
    ///
    /// # Errors
    ///
    /// Returns `OpticsError::InvalidParameter` for invalid params.
    pub fn new(params: OpticsParams) -> OpticsResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            strategy: ExpansionStrategy::default(),
        })
    }

    /// Select the expansion strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ExpansionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The validated parameters of this clusterer.
    pub fn params(&self) -> &OpticsParams {
        &self.params
    }

    /// Build the cluster order for `ids`.
    ///
    /// Every id appears exactly once in the result; the first entry of
    /// each connected run carries reachability infinity.
    ///
    /// # Errors
    ///
    /// Returns `OpticsError::EmptyDataset` if `ids` is empty.
    pub fn cluster_order<O: NeighborOracle>(
        &self,
        oracle: &O,
        ids: &[ObjectId],
    ) -> OpticsResult<ClusterOrder> {
        if ids.is_empty() {
            return Err(OpticsError::EmptyDataset);
        }
        debug!(
            n = ids.len(),
            min_pts = self.params.min_pts,
            epsilon = self.params.epsilon,
            strategy = self.strategy.description(),
            "building cluster order"
        );

        let source = RangeQuerySource {
            oracle,
            params: &self.params,
        };
        let order = match self.strategy {
            ExpansionStrategy::Heap => expand(&source, ids, &mut HeapFrontier::new()),
            ExpansionStrategy::List => expand(&source, ids, &mut ListFrontier::new()),
        };
        Ok(order)
    }
}

/// [`NeighborhoodSource`] that issues epsilon range queries and derives
/// core distances.
struct RangeQuerySource<'a, O: NeighborOracle> {
    oracle: &'a O,
    params: &'a OpticsParams,
}

impl<O: NeighborOracle> NeighborhoodSource for RangeQuerySource<'_, O> {
    fn neighborhood(&self, id: ObjectId) -> Neighborhood {
        let mut neighbors = self.oracle.range_query(id, self.params.epsilon);
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));

        // Core distance: distance to the min_pts-th neighbor (self included),
        // undefined when the neighborhood is too sparse.
        let core_distance = (neighbors.len() >= self.params.min_pts)
            .then(|| neighbors[self.params.min_pts - 1].distance);

        Neighborhood {
            core_distance,
            neighbors,
        }
    }
}
