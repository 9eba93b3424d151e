use glam::I64Vec2;
use serde::{Deserialize, Serialize};

/// Integer position on the relay plane.
pub type GridPoint = I64Vec2;

/// Stable, 1-based identifier of a point, assigned in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u32);

impl PointId {
    /// Id of the point stored at a 0-based index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// 0-based index this id refers to.
    pub fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
