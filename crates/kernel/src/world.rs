use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use relay_common::{GridPoint, PointId};

/// A labeled point on the relay plane.
///
/// `active` is the only field that changes after creation, and it only ever
/// goes from `true` to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub position: GridPoint,
    pub id: PointId,
    pub active: bool,
}

/// The set of points taking part in a run.
///
/// Points are never removed, so indices stay valid for the lifetime of the
/// world. The per-point `active` flag is authoritative; `active_cache` mirrors
/// it so the engine can walk active points in ascending index order without
/// touching eliminated ones. The cache is not serialized; it is rebuilt from
/// the flags on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "WorldRepr")]
pub struct World {
    points: Vec<Point>,
    #[serde(skip)]
    active_cache: BTreeSet<usize>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a world from positions in input order. Every point starts active
    /// and receives the id `index + 1`.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = GridPoint>,
    {
        let points: Vec<Point> = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| Point {
                position,
                id: PointId::from_index(index),
                active: true,
            })
            .collect();
        let active_cache = (0..points.len()).collect();
        Self {
            points,
            active_cache,
        }
    }

    /// Total number of points, active or not.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points still active.
    pub fn active_count(&self) -> usize {
        self.active_cache.len()
    }

    /// All points in index order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.points.get(index).is_some_and(|p| p.active)
    }

    /// Active indices in ascending order.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active_cache.iter().copied()
    }

    /// Mark a point inactive. Returns `false` if it was already inactive or
    /// the index is out of range. There is no inverse operation.
    pub fn deactivate(&mut self, index: usize) -> bool {
        match self.points.get_mut(index) {
            Some(point) if point.active => {
                point.active = false;
                self.active_cache.remove(&index);
                true
            }
            _ => false,
        }
    }

    /// Check that the active cache agrees with the per-point flags.
    pub fn is_consistent(&self) -> bool {
        self.points
            .iter()
            .enumerate()
            .all(|(index, p)| p.active == self.active_cache.contains(&index))
            && self.active_cache.iter().all(|&i| i < self.points.len())
    }

    /// Rebuild the active cache from the flags.
    pub fn rebuild_cache(&mut self) {
        self.active_cache = self
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active)
            .map(|(index, _)| index)
            .collect();
    }

    /// Compute a deterministic hash of positions and activity for comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        for point in &self.points {
            fnv_mix(&mut h, &point.position.x.to_le_bytes());
            fnv_mix(&mut h, &point.position.y.to_le_bytes());
            fnv_mix(&mut h, &point.id.0.to_le_bytes());
            fnv_mix(&mut h, &[point.active as u8]);
        }
        h
    }
}

#[derive(Deserialize)]
struct WorldRepr {
    points: Vec<Point>,
}

impl From<WorldRepr> for World {
    fn from(repr: WorldRepr) -> Self {
        let mut world = Self {
            points: repr.points,
            active_cache: BTreeSet::new(),
        };
        world.rebuild_cache();
        world
    }
}

pub(crate) fn fnv_mix(h: &mut u64, bytes: &[u8]) {
    for &b in bytes {
        *h ^= b as u64;
        *h = h.wrapping_mul(0x0100_0000_01b3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: i64) -> World {
        World::from_positions((0..n).map(|i| GridPoint::new(i, 0)))
    }

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert!(w.is_empty());
        assert_eq!(w.active_count(), 0);
        assert!(w.is_consistent());
    }

    #[test]
    fn ids_follow_input_order() {
        let w = line(3);
        let ids: Vec<u32> = w.points().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(w.points().iter().all(|p| p.active));
    }

    #[test]
    fn deactivate_updates_flag_and_cache() {
        let mut w = line(4);
        assert!(w.deactivate(2));
        assert!(!w.is_active(2));
        assert_eq!(w.active_count(), 3);
        assert_eq!(w.active_indices().collect::<Vec<_>>(), vec![0, 1, 3]);
        assert!(w.is_consistent());
    }

    #[test]
    fn deactivate_twice_is_rejected() {
        let mut w = line(2);
        assert!(w.deactivate(0));
        assert!(!w.deactivate(0));
        assert!(!w.deactivate(99));
        assert_eq!(w.active_count(), 1);
    }

    #[test]
    fn points_are_never_removed() {
        let mut w = line(5);
        for i in 0..5 {
            w.deactivate(i);
        }
        assert_eq!(w.len(), 5);
        assert_eq!(w.active_count(), 0);
        assert!(w.is_consistent());
    }

    #[test]
    fn deserialized_world_rebuilds_active_cache() {
        let mut w = line(3);
        w.deactivate(1);
        let json = serde_json::to_string(&w).unwrap();
        assert!(!json.contains("active_cache"));
        let restored: World = serde_json::from_str(&json).unwrap();
        assert!(restored.is_consistent());
        assert_eq!(restored.active_count(), 2);
        assert_eq!(restored.active_indices().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(restored.state_hash(), w.state_hash());
    }

    #[test]
    fn state_hash_tracks_activity() {
        let mut a = line(3);
        let b = line(3);
        assert_eq!(a.state_hash(), b.state_hash());
        a.deactivate(0);
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
