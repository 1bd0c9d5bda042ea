//! Cluster-order expansion: parameters, strategies, and the shared driver.
//!
//! The driver is a template-method skeleton: it owns the processed-set
//! bookkeeping, run restarts, and cluster-order emission, and is
//! parameterized over two seams - the [`Frontier`] (heap vs. list
//! candidate structure) and the [`NeighborhoodSource`] (exact range
//! queries vs. FastOPTICS' precomputed neighborhoods). The Xi extractor
//! never learns which combination produced its input.

mod fast;
mod frontier;
mod optics;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::oracle::Neighbor;
use crate::order::ClusterOrder;
use crate::types::ObjectId;

pub use fast::FastOpticsClusterer;
pub use optics::OpticsClusterer;

pub(crate) use frontier::{Frontier, HeapFrontier, ListFrontier};

// =============================================================================
// OpticsParams
// =============================================================================

/// Parameters for an exact OPTICS run.
///
/// # Example
///
/// ```
/// use reachplot_core::OpticsParams;
///
/// let params = OpticsParams::default().with_min_pts(3);
/// assert!(params.epsilon.is_infinite());
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticsParams {
    /// Maximum neighborhood radius for range queries.
    pub epsilon: f64,

    /// Neighbor count required for a point to be core, and the rank of the
    /// neighbor whose distance becomes the core distance.
    pub min_pts: usize,
}

impl Default for OpticsParams {
    fn default() -> Self {
        Self {
            epsilon: f64::INFINITY,
            min_pts: 5,
        }
    }
}

impl OpticsParams {
    /// Create new params.
    ///
    /// Values are NOT automatically validated - call validate() to check.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set the neighborhood radius.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the minimum neighbor count.
    #[must_use]
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// Returns `OpticsError::InvalidParameter` if:
    /// - min_pts < 1
    /// - epsilon is NaN or not positive
    pub fn validate(&self) -> Result<(), crate::error::OpticsError> {
        if self.min_pts < 1 {
            return Err(crate::error::OpticsError::invalid_parameter(format!(
                "min_pts must be >= 1, got {}",
                self.min_pts
            )));
        }
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return Err(crate::error::OpticsError::invalid_parameter(format!(
                "epsilon must be a positive radius, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Get default OPTICS parameters (epsilon = infinity, min_pts = 5).
pub fn optics_defaults() -> OpticsParams {
    OpticsParams::default()
}

// =============================================================================
// ExpansionStrategy
// =============================================================================

/// Which candidate structure the exact expansion runs against.
///
/// Both strategies produce byte-identical cluster orders; they differ only
/// in cost profile. Heap pays O(log n) per push, List pays a linear scan
/// per extraction but updates candidates in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExpansionStrategy {
    /// Priority-queue expansion with lazy decrease-key (the default).
    #[default]
    Heap,
    /// Linear-scan expansion over an unsorted candidate array.
    List,
}

impl ExpansionStrategy {
    /// Get description of this strategy.
    pub fn description(&self) -> &'static str {
        match self {
            ExpansionStrategy::Heap => "binary min-heap with lazy decrease-key",
            ExpansionStrategy::List => "unsorted candidate array with linear-scan extraction",
        }
    }
}

// =============================================================================
// Shared driver
// =============================================================================

/// One point's expansion data, produced by a [`NeighborhoodSource`].
pub(crate) struct Neighborhood {
    /// Core distance of the expanded point; None means the point is not
    /// core and must not update anyone's reachability.
    pub core_distance: Option<f64>,
    /// Eligible neighbors, sorted ascending by `(distance, id)`.
    pub neighbors: Vec<Neighbor>,
}

/// The neighbor-semantics seam of the expansion skeleton.
pub(crate) trait NeighborhoodSource {
    fn neighborhood(&self, id: ObjectId) -> Neighborhood;
}

/// Run the expansion over `ids`, restarting with reachability infinity
/// whenever the frontier drains while unvisited ids remain.
///
/// Restart seeds are taken in `ids` order, which makes the whole run
/// deterministic for a deterministic source.
pub(crate) fn expand<S, F>(source: &S, ids: &[ObjectId], frontier: &mut F) -> ClusterOrder
where
    S: NeighborhoodSource,
    F: Frontier,
{
    let mut order = ClusterOrder::with_capacity(ids.len());
    let mut processed: HashSet<ObjectId> = HashSet::with_capacity(ids.len());

    for &seed in ids {
        if processed.contains(&seed) {
            continue;
        }
        trace!(seed = %seed, position = order.len(), "starting expansion run");
        emit(source, frontier, &mut order, &mut processed, seed, f64::INFINITY, None);

        while let Some(candidate) = frontier.pop_min() {
            if processed.contains(&candidate.id) {
                // Stale heap entry; a better one for this id was already emitted.
                continue;
            }
            emit(
                source,
                frontier,
                &mut order,
                &mut processed,
                candidate.id,
                candidate.reachability,
                Some(candidate.predecessor),
            );
        }
    }

    debug!(entries = order.len(), "expansion complete");
    order
}

/// Emit one point to the cluster order and push its eligible neighbors.
fn emit<S, F>(
    source: &S,
    frontier: &mut F,
    order: &mut ClusterOrder,
    processed: &mut HashSet<ObjectId>,
    id: ObjectId,
    reachability: f64,
    predecessor: Option<ObjectId>,
) where
    S: NeighborhoodSource,
    F: Frontier,
{
    processed.insert(id);
    order.push(id, reachability, predecessor);

    let expansion = source.neighborhood(id);
    let Some(core_distance) = expansion.core_distance else {
        // Not a core point: emitted, but expands nothing.
        return;
    };
    for neighbor in expansion.neighbors {
        if processed.contains(&neighbor.id) {
            continue;
        }
        frontier.offer(neighbor.id, id, core_distance.max(neighbor.distance));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // PARAMS TESTS
    // =========================================================================

    #[test]
    fn test_optics_params_defaults() {
        let params = optics_defaults();
        assert!(params.epsilon.is_infinite());
        assert_eq!(params.min_pts, 5);
        assert!(params.validate().is_ok());

        println!("[PASS] test_optics_params_defaults");
    }

    #[test]
    fn test_optics_params_validation() {
        assert!(OpticsParams::new(1.0, 0).validate().is_err(), "min_pts 0");
        assert!(OpticsParams::new(0.0, 3).validate().is_err(), "epsilon 0");
        assert!(OpticsParams::new(-1.0, 3).validate().is_err(), "negative");
        assert!(OpticsParams::new(f64::NAN, 3).validate().is_err(), "NaN");
        assert!(OpticsParams::new(2.5, 1).validate().is_ok());

        println!("[PASS] test_optics_params_validation");
    }

    #[test]
    fn test_optics_params_builder_and_serde() {
        let params = OpticsParams::default().with_epsilon(4.0).with_min_pts(2);

        let json = serde_json::to_string(&params).expect("serialize must succeed");
        let restored: OpticsParams = serde_json::from_str(&json).expect("deserialize must succeed");
        assert_eq!(restored, params);

        println!("[PASS] test_optics_params_builder_and_serde - json={}", json);
    }

    #[test]
    fn test_strategy_default_and_description() {
        assert_eq!(ExpansionStrategy::default(), ExpansionStrategy::Heap);
        assert!(ExpansionStrategy::List.description().contains("linear-scan"));

        println!("[PASS] test_strategy_default_and_description");
    }
}
