//! Steep-area primitives for the Xi scan.

use serde::{Deserialize, Serialize};

use crate::order::ClusterOrder;

/// Direction of a steep area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SteepDirection {
    /// Reachability falls by at least a factor `1 - xi` per step.
    Down,
    /// Reachability rises by at least a factor `1 - xi` per step.
    Up,
}

/// Diagnostic record of one steep area found during extraction.
///
/// Returned in discovery order when
/// [`XiParams::keepsteep`](crate::XiParams) is set, for reachability-plot
/// tooling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteepArea {
    /// Up or down.
    pub direction: SteepDirection,
    /// First cluster-order index of the area.
    pub start: usize,
    /// Last cluster-order index of the area (inclusive).
    pub end: usize,
    /// The area's reference maximum: the start reachability for down
    /// areas, the end-successor reachability for up areas.
    pub maximum: f64,
}

/// A pending steep-down area.
///
/// Lives in an arena owned by the extractor; the active set references
/// areas by arena index, and only `mib` mutates after creation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SteepDownArea {
    pub start: usize,
    pub end: usize,
    /// Reachability at the start of the area.
    pub maximum: f64,
    /// Maximum reachability observed since this area was recorded.
    pub mib: f64,
}

/// Scan cursor over a completed cluster order.
///
/// Exposes the current and successor reachability plus the steep-up /
/// steep-down predicates the Xi state machine is written against.
#[derive(Debug)]
pub(crate) struct SteepScan<'a> {
    order: &'a ClusterOrder,
    pub index: usize,
}

impl<'a> SteepScan<'a> {
    pub fn new(order: &'a ClusterOrder) -> Self {
        Self { order, index: 0 }
    }

    /// Whether the cursor still points at an entry.
    #[inline]
    pub fn valid(&self) -> bool {
        self.index < self.order.len()
    }

    /// Whether a successor entry exists.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.order.len()
    }

    #[inline]
    pub fn advance(&mut self) {
        self.index += 1;
    }

    /// Reachability at the cursor (infinity once past the end).
    pub fn reachability(&self) -> f64 {
        self.order
            .get(self.index)
            .map_or(f64::INFINITY, |e| e.reachability)
    }

    /// Reachability of the successor (infinity when there is none).
    pub fn next_reachability(&self) -> f64 {
        self.order
            .get(self.index + 1)
            .map_or(f64::INFINITY, |e| e.reachability)
    }

    /// Steep-up test: current reachability is finite and at most
    /// `next * ixi` (a missing successor counts as steep).
    pub fn steep_up(&self, ixi: f64) -> bool {
        let current = self.reachability();
        if current.is_infinite() {
            return false;
        }
        if !self.has_next() {
            return true;
        }
        current <= self.next_reachability() * ixi
    }

    /// Steep-down test: a finite successor exists and `current * ixi`
    /// still reaches it.
    pub fn steep_down(&self, ixi: f64) -> bool {
        if !self.has_next() {
            return false;
        }
        let next = self.next_reachability();
        if next.is_infinite() {
            return false;
        }
        self.reachability() * ixi >= next
    }
}
