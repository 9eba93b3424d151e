use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GridPoint;

/// One of the eight compass rays a token can travel along.
///
/// The discriminant is the position in the cyclic order, so `N as usize == 0`
/// and `NW as usize == 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Returned when a token is not one of the eight compass names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction {0:?} (expected one of N, NE, E, SE, S, SW, W, NW)")]
pub struct ParseDirectionError(pub String);

impl Direction {
    /// All directions in cyclic order.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Position in the cyclic order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Direction at `index` modulo 8.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 8]
    }

    /// Advance `steps` positions through the cyclic order.
    pub fn rotated(self, steps: usize) -> Self {
        Self::from_index(self.index() + steps % 8)
    }

    pub fn opposite(self) -> Self {
        self.rotated(4)
    }

    /// Unit step along this ray.
    pub fn unit(self) -> GridPoint {
        match self {
            Direction::N => GridPoint::new(0, 1),
            Direction::NE => GridPoint::new(1, 1),
            Direction::E => GridPoint::new(1, 0),
            Direction::SE => GridPoint::new(1, -1),
            Direction::S => GridPoint::new(0, -1),
            Direction::SW => GridPoint::new(-1, -1),
            Direction::W => GridPoint::new(-1, 0),
            Direction::NW => GridPoint::new(-1, 1),
        }
    }

    /// The full sweep a holder searches after receiving from `self`:
    /// starts one position past the arrival direction and visits all eight.
    pub fn search_order(self) -> impl Iterator<Item = Direction> {
        (1..=8).map(move |step| self.rotated(step))
    }

    /// Classify the offset from `from` to `to` as lying exactly on one of the
    /// eight rays.
    ///
    /// Returns the ray and the step distance along it (the absolute parallel
    /// offset for axis rays, `|dx|` for diagonals). Coincident points or an
    /// offset off every ray yield `None`. The offset is taken in `i128`, so
    /// any pair of `i64` coordinates classifies exactly.
    pub fn classify(from: GridPoint, to: GridPoint) -> Option<(Direction, u64)> {
        let dx = i128::from(to.x) - i128::from(from.x);
        let dy = i128::from(to.y) - i128::from(from.y);
        let direction = match (dx.signum(), dy.signum()) {
            (0, 0) => return None,
            (0, 1) => Direction::N,
            (0, -1) => Direction::S,
            (1, 0) => Direction::E,
            (-1, 0) => Direction::W,
            _ if dx.unsigned_abs() != dy.unsigned_abs() => return None,
            (1, 1) => Direction::NE,
            (1, -1) => Direction::SE,
            (-1, -1) => Direction::SW,
            _ => Direction::NW,
        };
        let distance = if dx == 0 { dy } else { dx };
        // |i64 - i64| is at most u64::MAX.
        let distance = u64::try_from(distance.unsigned_abs()).ok()?;
        Some((direction, distance))
    }

    /// Compass direction pointing from `from` toward `to`, if they are aligned.
    pub fn between(from: GridPoint, to: GridPoint) -> Option<Direction> {
        Self::classify(from, to).map(|(direction, _)| direction)
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}
