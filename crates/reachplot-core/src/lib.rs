//! Reachplot Core Library
//!
//! Density-based cluster ordering (OPTICS) and hierarchical cluster
//! extraction (Xi) over a pluggable neighbor oracle.
//!
//! # Architecture
//!
//! This crate defines:
//! - Cluster-order types (`ClusterOrder`, `OrderEntry`, `ObjectId`)
//! - Neighbor access traits (`NeighborOracle`, `ProjectedNeighborhoods`)
//!   with brute-force and table-backed implementations
//! - The exact engine (`OpticsClusterer`) with interchangeable heap and
//!   list expansion strategies
//! - The approximate engine (`FastOpticsClusterer`) over precomputed
//!   neighborhoods
//! - The Xi post-processor (`XiExtractor`) producing a nested
//!   `Clustering` forest from any cluster order
//! - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use reachplot_core::oracle::BruteForceOracle;
//! use reachplot_core::{OpticsClusterer, OpticsParams, XiExtractor, XiParams};
//!
//! let oracle = BruteForceOracle::new(vec![
//!     vec![0.0, 0.0], vec![0.3, 0.0], vec![0.0, 0.3],
//!     vec![8.0, 8.0], vec![8.3, 8.0], vec![8.0, 8.3],
//! ]).unwrap();
//!
//! let clusterer = OpticsClusterer::new(OpticsParams::default().with_min_pts(2)).unwrap();
//! let order = clusterer.cluster_order(&oracle, &oracle.ids()).unwrap();
//!
//! let extraction = XiExtractor::new(XiParams::new(0.1, 2)).unwrap()
//!     .extract(&order)
//!     .unwrap();
//! assert!(!extraction.clustering.is_empty());
//! ```

pub mod error;
pub mod expansion;
pub mod oracle;
pub mod order;
pub mod types;
pub mod xi;

// Re-exports for convenience
pub use error::{OpticsError, OpticsResult};
pub use expansion::{
    optics_defaults, ExpansionStrategy, FastOpticsClusterer, OpticsClusterer, OpticsParams,
};
pub use order::{ClusterOrder, OrderEntry};
pub use types::ObjectId;
pub use xi::{
    Cluster, Clustering, SteepArea, SteepDirection, XiExtraction, XiExtractor, XiParams,
};
