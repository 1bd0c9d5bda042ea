//! Opaque object handles used throughout the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle identifying one object of the dataset.
///
/// The engine never dereferences an id itself; it only hands ids to the
/// [`NeighborOracle`](crate::oracle::NeighborOracle) and uses their total
/// order to break reachability ties deterministically. Callers assign ids;
/// dense `0..n` handles are the usual choice.
///
/// # Example
///
/// ```
/// use reachplot_core::ObjectId;
///
/// let a = ObjectId(3);
/// let b = ObjectId(7);
/// assert!(a < b);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Build a dense id range `0..n`, the common way to address a dataset.
    pub fn dense(n: usize) -> Vec<ObjectId> {
        (0..n as u64).map(ObjectId).collect()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        ObjectId(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_ordering_and_display() {
        let ids = ObjectId::dense(3);
        assert_eq!(ids, vec![ObjectId(0), ObjectId(1), ObjectId(2)]);
        assert!(ids[0] < ids[2]);
        assert_eq!(ids[1].to_string(), "#1");

        println!("[PASS] test_object_id_ordering_and_display");
    }

    #[test]
    fn test_object_id_serde_transparent() {
        let id = ObjectId(42);
        let json = serde_json::to_string(&id).expect("serialize must succeed");
        assert_eq!(json, "42", "transparent serde should emit the raw integer");
        let restored: ObjectId = serde_json::from_str(&json).expect("deserialize must succeed");
        assert_eq!(restored, id);

        println!("[PASS] test_object_id_serde_transparent - json={}", json);
    }
}
