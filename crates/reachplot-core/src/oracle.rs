//! Neighbor services consumed by the expansion engines.
//!
//! The engine never assumes an index structure. It only requires the two
//! query shapes below and that repeated calls with the same arguments are
//! deterministic within one run. Production callers typically back these
//! traits with a spatial index; the in-memory reference implementations
//! here exist for tests and small datasets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{OpticsError, OpticsResult};
use crate::types::ObjectId;

/// One neighbor returned by a query, with its distance to the query object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// The neighboring object.
    pub id: ObjectId,
    /// Distance from the query object to this neighbor.
    pub distance: f64,
}

/// Exact range-query service backing the heap and list expansions.
///
/// Contract:
/// - results are sorted ascending by `(distance, id)`;
/// - the query object itself is included (at distance 0);
/// - repeated identical calls return identical results within one run.
pub trait NeighborOracle {
    /// All objects within `radius` of `id`, including `id` itself.
    fn range_query(&self, id: ObjectId, radius: f64) -> Vec<Neighbor>;
}

/// Approximate neighbor service backing FastOPTICS.
///
/// Neighbor sets and inverse densities are precomputed upstream (typically
/// by a random-projection index) and fixed for the whole run. The inverse
/// density stands in for a core distance; no k-th-neighbor computation
/// happens on this path. Neighbor sets need not include the query object
/// and may be empty.
pub trait ProjectedNeighborhoods {
    /// Precomputed approximate neighbors of `id`, sorted ascending by
    /// `(distance, id)`.
    fn neighbors(&self, id: ObjectId) -> Vec<Neighbor>;

    /// Precomputed inverse-density proxy for the core distance of `id`.
    fn inverse_density(&self, id: ObjectId) -> f64;
}

// =============================================================================
// BruteForceOracle
// =============================================================================

/// O(n²) in-memory Euclidean reference implementation of [`NeighborOracle`].
///
/// Objects are addressed by dense ids `0..n` matching the row order of the
/// points passed in.
///
/// # Example
///
/// ```
/// use reachplot_core::oracle::{BruteForceOracle, NeighborOracle};
/// use reachplot_core::ObjectId;
///
/// let oracle = BruteForceOracle::new(vec![
///     vec![0.0, 0.0],
///     vec![3.0, 4.0],
/// ]).unwrap();
///
/// let hits = oracle.range_query(ObjectId(0), 10.0);
/// assert_eq!(hits.len(), 2);
/// assert_eq!(hits[0].id, ObjectId(0)); // self at distance 0
/// assert_eq!(hits[1].distance, 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct BruteForceOracle {
    points: Vec<Vec<f64>>,
}

impl BruteForceOracle {
    /// Build an oracle over `points`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::EmptyDataset`] for zero points and
    /// [`OpticsError::DimensionMismatch`] if rows disagree on dimension.
    pub fn new(points: Vec<Vec<f64>>) -> OpticsResult<Self> {
        let first = points.first().ok_or(OpticsError::EmptyDataset)?;
        let dim = first.len();
        for point in &points {
            if point.len() != dim {
                return Err(OpticsError::DimensionMismatch {
                    expected: dim,
                    actual: point.len(),
                });
            }
        }
        Ok(Self { points })
    }

    /// Number of objects held.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the oracle holds no objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The dense id set `0..n` addressing the stored points.
    pub fn ids(&self) -> Vec<ObjectId> {
        ObjectId::dense(self.points.len())
    }

    fn distance(&self, a: usize, b: usize) -> f64 {
        self.points[a]
            .iter()
            .zip(&self.points[b])
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}

impl NeighborOracle for BruteForceOracle {
    fn range_query(&self, id: ObjectId, radius: f64) -> Vec<Neighbor> {
        let query = id.0 as usize;
        let mut hits: Vec<Neighbor> = (0..self.points.len())
            .map(|other| Neighbor {
                id: ObjectId(other as u64),
                distance: self.distance(query, other),
            })
            .filter(|n| n.distance <= radius)
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        hits
    }
}

// =============================================================================
// FixedNeighborhoods
// =============================================================================

/// [`ProjectedNeighborhoods`] backed by explicit per-id tables.
///
/// The stand-in for an upstream random-projection index: callers (and the
/// test suite) load precomputed neighbor lists and inverse densities, and
/// FastOPTICS consumes them as-is.
#[derive(Debug, Clone, Default)]
pub struct FixedNeighborhoods {
    neighbors: HashMap<ObjectId, Vec<Neighbor>>,
    densities: HashMap<ObjectId, f64>,
}

impl FixedNeighborhoods {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` with its precomputed neighbors and inverse density.
    ///
    /// Neighbors are re-sorted to the `(distance, id)` contract order.
    pub fn insert(&mut self, id: ObjectId, mut neighbors: Vec<Neighbor>, inverse_density: f64) {
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        self.neighbors.insert(id, neighbors);
        self.densities.insert(id, inverse_density);
    }
}

impl ProjectedNeighborhoods for FixedNeighborhoods {
    fn neighbors(&self, id: ObjectId) -> Vec<Neighbor> {
        self.neighbors.get(&id).cloned().unwrap_or_default()
    }

    fn inverse_density(&self, id: ObjectId) -> f64 {
        self.densities.get(&id).copied().unwrap_or(f64::INFINITY)
    }
}
