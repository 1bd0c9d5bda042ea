//! Xi extraction: hierarchical clusters from a completed cluster order.
//!
//! A single forward scan over the reachability plot. Steep-down runs open
//! candidate areas; a later steep-up run closes every still-valid candidate
//! into a cluster, nesting previously found clusters inside. Validity is
//! policed by the maximum reachability seen in between (`mib`), a
//! predecessor-consistency filter trims boundary artifacts, and whatever
//! the scan never claims ends up in one trailing remainder cluster.

mod hierarchy;
mod steep;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OpticsError, OpticsResult};
use crate::order::ClusterOrder;

pub use hierarchy::{Cluster, Clustering};
pub use steep::{SteepArea, SteepDirection};

use hierarchy::HierarchyBuilder;
use steep::{SteepDownArea, SteepScan};

// =============================================================================
// XiParams
// =============================================================================

/// Parameters for Xi extraction.
///
/// # Example
///
/// ```
/// use reachplot_core::XiParams;
///
/// let params = XiParams::new(0.05, 5);
/// assert!(params.validate().is_ok());
/// assert!((params.ixi() - 0.95).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XiParams {
    /// Relative steepness threshold, in `[0, 1)`.
    pub xi: f64,

    /// Minimum cluster size, and the flat-step tolerance when extending
    /// steep runs. Reuse the `min_pts` of the OPTICS run.
    pub min_pts: usize,

    /// Disable the predecessor-consistency boundary filter.
    pub nocorrect: bool,

    /// Keep the ordered list of steep areas found, for plot diagnostics.
    pub keepsteep: bool,
}

impl Default for XiParams {
    fn default() -> Self {
        Self {
            xi: 0.05,
            min_pts: 5,
            nocorrect: false,
            keepsteep: false,
        }
    }
}

impl XiParams {
    /// Create new params with the default flags.
    ///
    /// Values are NOT automatically validated - call validate() to check.
    pub fn new(xi: f64, min_pts: usize) -> Self {
        Self {
            xi,
            min_pts,
            ..Self::default()
        }
    }

    /// Set the steepness threshold.
    #[must_use]
    pub fn with_xi(mut self, xi: f64) -> Self {
        self.xi = xi;
        self
    }

    /// Set the minimum cluster size.
    #[must_use]
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Disable the predecessor-consistency filter.
    #[must_use]
    pub fn without_correction(mut self) -> Self {
        self.nocorrect = true;
        self
    }

    /// Retain steep-area diagnostics in the extraction result.
    #[must_use]
    pub fn with_steep_areas(mut self) -> Self {
        self.keepsteep = true;
        self
    }

    /// The derived per-step steepness factor `1 - xi`.
    #[inline]
    pub fn ixi(&self) -> f64 {
        1.0 - self.xi
    }

    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// Returns `OpticsError::InvalidParameter` if:
    /// - xi is outside `[0, 1)` or NaN
    /// - min_pts < 1
    pub fn validate(&self) -> Result<(), OpticsError> {
        if !(0.0..1.0).contains(&self.xi) {
            return Err(OpticsError::invalid_parameter(format!(
                "xi must be in [0, 1), got {}",
                self.xi
            )));
        }
        if self.min_pts < 1 {
            return Err(OpticsError::invalid_parameter(format!(
                "min_pts must be >= 1, got {}",
                self.min_pts
            )));
        }
        Ok(())
    }
}

/// Result of one Xi extraction.
#[derive(Debug, Clone)]
pub struct XiExtraction {
    /// The extracted cluster forest.
    pub clustering: Clustering,
    /// Steep areas in discovery order, when `keepsteep` was set.
    pub steep_areas: Option<Vec<SteepArea>>,
}

// =============================================================================
// XiExtractor
// =============================================================================

/// Scans a completed [`ClusterOrder`] for nested steep regions.
///
/// The extractor is independent of which expansion strategy produced the
/// order. It never fails on structurally odd input: an order of all
/// infinite reachabilities simply yields zero extracted clusters and one
/// trailing noise cluster.
///
/// # Example
///
/// ```
/// use reachplot_core::oracle::BruteForceOracle;
/// use reachplot_core::{OpticsClusterer, OpticsParams, XiExtractor, XiParams};
///
/// let oracle = BruteForceOracle::new(vec![
///     vec![0.0], vec![0.2], vec![0.4], vec![9.0], vec![9.2], vec![9.4],
/// ]).unwrap();
/// let order = OpticsClusterer::new(OpticsParams::default().with_min_pts(2))
///     .unwrap()
///     .cluster_order(&oracle, &oracle.ids())
///     .unwrap();
///
/// let extractor = XiExtractor::new(XiParams::new(0.1, 2)).unwrap();
/// let result = extractor.extract(&order).unwrap();
/// assert!(!result.clustering.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct XiExtractor {
    params: XiParams,
}

impl XiExtractor {
    /// Create an extractor with validated params.
    ///
    /// # Errors
    ///
    /// Returns `OpticsError::InvalidParameter` for invalid params.
    pub fn new(params: XiParams) -> OpticsResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The validated parameters of this extractor.
    pub fn params(&self) -> &XiParams {
        &self.params
    }

    /// Extract the cluster hierarchy from `order`.
    ///
    /// # Errors
    ///
    /// Returns `OpticsError::EmptyDataset` if `order` is empty.
    pub fn extract(&self, order: &ClusterOrder) -> OpticsResult<XiExtraction> {
        if order.is_empty() {
            return Err(OpticsError::EmptyDataset);
        }
        let n = order.len();
        let ixi = self.params.ixi();
        let min_pts = self.params.min_pts;

        // Maximum reachability seen since the last steep area was opened.
        let mut mib = 0.0_f64;
        // Arena of every steep-down area discovered; `pending` references
        // the still-open ones by arena index.
        let mut areas: Vec<SteepDownArea> = Vec::new();
        let mut pending: Vec<usize> = Vec::new();
        let mut diagnostics: Vec<SteepArea> = Vec::new();
        let mut builder = HierarchyBuilder::new(order);
        let mut scan = SteepScan::new(order);

        while scan.valid() {
            mib = mib.max(scan.reachability());

            if scan.steep_down(ixi) {
                filter_pending(&mut areas, &mut pending, mib, ixi);
                let start = scan.index;
                let mut end = scan.index;
                let maximum = scan.reachability();
                // Greedy extension: strictly steep steps move the end,
                // weakly-down steps are tolerated for up to min_pts flats.
                loop {
                    scan.advance();
                    if !scan.valid() {
                        break;
                    }
                    if scan.steep_down(ixi) {
                        end = scan.index;
                        continue;
                    }
                    if !scan.steep_down(1.0) || scan.index - end > min_pts {
                        break;
                    }
                }
                pending.push(areas.len());
                areas.push(SteepDownArea {
                    start,
                    end,
                    maximum,
                    mib: 0.0,
                });
                if self.params.keepsteep {
                    diagnostics.push(SteepArea {
                        direction: SteepDirection::Down,
                        start,
                        end,
                        maximum,
                    });
                }
                mib = 0.0;
            } else if scan.steep_up(ixi) {
                filter_pending(&mut areas, &mut pending, mib, ixi);
                let start = scan.index;
                let mut end = scan.index;
                // Reachability just past the end of the up run; this is the
                // plateau the candidate down areas are measured against.
                let mut end_successor = scan.next_reachability();
                while !end_successor.is_infinite() && scan.has_next() {
                    scan.advance();
                    if scan.steep_up(ixi) {
                        end = scan.index;
                        end_successor = scan.next_reachability();
                        continue;
                    }
                    if !scan.steep_up(1.0) || scan.index - end > min_pts {
                        break;
                    }
                }
                if end_successor.is_infinite() {
                    // Consume the terminal point so the next iteration can
                    // open a fresh run behind it.
                    scan.advance();
                }
                if self.params.keepsteep {
                    diagnostics.push(SteepArea {
                        direction: SteepDirection::Up,
                        start,
                        end,
                        maximum: end_successor,
                    });
                }

                mib = end_successor;
                let threshold = mib * ixi;
                // Most recent areas first, so nested clusters are built
                // before the ones enclosing them.
                for &area_idx in pending.iter().rev() {
                    let sda = areas[area_idx];
                    // Condition 3b: the plateau must clear what was seen
                    // between the down area and here.
                    if threshold < sda.mib {
                        continue;
                    }
                    let (cstart, cend) = self.cluster_span(order, &sda, end, end_successor, n);
                    if cend - cstart + 1 < min_pts {
                        continue;
                    }
                    builder.add_cluster(order, cstart, cend);
                }
            } else {
                scan.advance();
            }
        }

        let clustering = builder.finish(order);
        debug!(
            n,
            clusters = clustering.len(),
            roots = clustering.roots().len(),
            "xi extraction complete"
        );
        Ok(XiExtraction {
            clustering,
            steep_areas: self.params.keepsteep.then_some(diagnostics),
        })
    }

    /// Final `[start, end]` span for one down-area/up-area combination:
    /// boundary adjustment followed by the predecessor filter.
    fn cluster_span(
        &self,
        order: &ClusterOrder,
        sda: &SteepDownArea,
        up_end: usize,
        up_maximum: f64,
        n: usize,
    ) -> (usize, usize) {
        let reach = |i: usize| order.get(i).map_or(f64::INFINITY, |e| e.reachability);

        let mut cstart = sda.start;
        let mut cend = up_end.min(n - 1);

        // Condition 4: trim whichever side towers over the other.
        if sda.maximum * self.params.ixi() >= up_maximum {
            while cstart < cend && reach(cstart + 1) > up_maximum {
                cstart += 1;
            }
        } else if up_maximum * self.params.ixi() >= sda.maximum {
            while cend > cstart && reach(cend) > sda.maximum {
                cend -= 1;
            }
        }

        if !self.params.nocorrect {
            // Drop trailing points whose predecessor lies outside the
            // cluster; they are ordering artifacts, not members.
            while cend > cstart {
                if reach(cend) < reach(cstart) {
                    break;
                }
                let anchored = order
                    .get(cend)
                    .and_then(|e| e.predecessor)
                    .and_then(|p| order.index_of(p))
                    .is_some_and(|p_idx| p_idx >= cstart && p_idx < cend);
                if anchored {
                    break;
                }
                cend -= 1;
            }
        }

        (cstart, cend)
    }
}

/// Drop every pending down area whose maximum can no longer clear `mib`,
/// and lift the survivors' `mib` to the current value.
fn filter_pending(areas: &mut [SteepDownArea], pending: &mut Vec<usize>, mib: f64, ixi: f64) {
    pending.retain(|&idx| {
        let area = &mut areas[idx];
        if area.maximum * ixi <= mib {
            return false;
        }
        if mib > area.mib {
            area.mib = mib;
        }
        true
    });
}
