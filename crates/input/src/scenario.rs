use relay_common::{Direction, GridPoint, ParseDirectionError, PointId};
use relay_kernel::{KernelError, SimulationState, World};

use crate::tokens::TokenCursor;

/// Header values above this are read as the point count of a headerless input.
const HEADER_COUNT_THRESHOLD: i64 = 1000;

/// Errors that stop a scenario from being built at all.
///
/// Bad coordinate pairs are not in here: they truncate the point list instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("input needs at least two tokens, found {0}")]
    TooFewTokens(usize),
    #[error("missing arrival direction after the point list")]
    MissingDirection,
    #[error(transparent)]
    UnknownDirection(#[from] ParseDirectionError),
    #[error("missing start index after the arrival direction")]
    MissingStart,
    #[error("start index {0:?} is not a number")]
    InvalidStart(String),
    #[error("start index {start} is outside 1..={points}")]
    StartOutOfRange { start: i64, points: usize },
}

/// A parsed relay input, ready to become a [`SimulationState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub points: Vec<GridPoint>,
    pub incoming: Direction,
    pub start: PointId,
    /// Number of points the input announced.
    pub declared: usize,
    /// The point list ended early on a non-numeric coordinate.
    pub truncated: bool,
    /// The first header value was large enough to be read as the point count.
    pub header_reinterpreted: bool,
}

impl Scenario {
    /// Build the initial run state with the default history capacity.
    pub fn into_state(self) -> Result<SimulationState, KernelError> {
        let start = self.start_index();
        SimulationState::new(World::from_positions(self.points), start, self.incoming)
    }

    pub fn into_state_with_capacity(self, capacity: usize) -> Result<SimulationState, KernelError> {
        let start = self.start_index();
        SimulationState::with_history_capacity(
            World::from_positions(self.points),
            start,
            self.incoming,
            capacity,
        )
    }

    fn start_index(&self) -> usize {
        self.start.index().unwrap_or(0)
    }
}

/// Parse the relay text format.
///
/// Layout: `T N x1 y1 ... xN yN DIR START`. When `T` exceeds 1000 the input is
/// taken to have no leading `T`: the first value is the point count and the
/// coordinates start right after it. Pairs are read until `N` are collected
/// or a pair has a non-numeric value; in the latter case both tokens of the
/// failed pair are consumed and the points read so far are kept.
pub fn parse_scenario(text: &str) -> Result<Scenario, ParseError> {
    let mut cursor = TokenCursor::new(text);
    if cursor.len() < 2 {
        return Err(ParseError::TooFewTokens(cursor.len()));
    }

    let first = cursor.next_int();
    let mut count = cursor.next_int();
    let header_reinterpreted = first.is_some_and(|t| t > HEADER_COUNT_THRESHOLD);
    if header_reinterpreted {
        tracing::warn!(
            header = ?first,
            "first header value exceeds {HEADER_COUNT_THRESHOLD}, reading it as the point count"
        );
        count = first;
        cursor.seek(1);
    }

    let declared = count.map_or(0, |n| n.max(0) as usize);
    let mut points = Vec::new();
    let mut truncated = false;
    while points.len() < declared {
        let x = cursor.next_int();
        let y = cursor.next_int();
        match (x, y) {
            (Some(x), Some(y)) => points.push(GridPoint::new(x, y)),
            _ => {
                truncated = true;
                break;
            }
        }
    }
    if truncated {
        tracing::warn!(
            declared,
            read = points.len(),
            "non-numeric coordinate, keeping the points read so far"
        );
    }

    let incoming: Direction = cursor
        .next_token()
        .ok_or(ParseError::MissingDirection)?
        .parse()?;

    let start_token = cursor.next_token().ok_or(ParseError::MissingStart)?;
    let start = crate::tokens::parse_int_prefix(start_token)
        .ok_or_else(|| ParseError::InvalidStart(start_token.to_string()))?;
    if start < 1 || start as u64 > points.len() as u64 {
        return Err(ParseError::StartOutOfRange {
            start,
            points: points.len(),
        });
    }

    tracing::debug!(
        points = points.len(),
        %incoming,
        start,
        "parsed scenario"
    );
    Ok(Scenario {
        points,
        incoming,
        start: PointId(start as u32),
        declared,
        truncated,
        header_reinterpreted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_input() {
        let s = parse_scenario("1 2\n0 0\n0 5\nN 1\n").unwrap();
        assert_eq!(s.points, vec![GridPoint::new(0, 0), GridPoint::new(0, 5)]);
        assert_eq!(s.incoming, Direction::N);
        assert_eq!(s.start, PointId(1));
        assert_eq!(s.declared, 2);
        assert!(!s.truncated);
        assert!(!s.header_reinterpreted);
    }

    #[test]
    fn negative_coordinates() {
        let s = parse_scenario("1 3 -1 -1 2 -2 0 0 SW 3").unwrap();
        assert_eq!(s.points[0], GridPoint::new(-1, -1));
        assert_eq!(s.points[1], GridPoint::new(2, -2));
        assert_eq!(s.start, PointId(3));
    }

    #[test]
    fn large_first_value_is_the_point_count() {
        // 1001 points is impractical here; the list truncates at the direction
        // token, which the cursor then skips past.
        let err = parse_scenario("1001 0 0 0 5 N 1").unwrap_err();
        assert_eq!(err, ParseError::MissingDirection);

        let s = parse_scenario("1000 2 0 0 0 5 E 2").unwrap();
        assert!(!s.header_reinterpreted);
        assert_eq!(s.points.len(), 2);
    }

    #[test]
    fn reinterpreted_header_reads_coordinates_after_first_token() {
        // Count 1001 is never reached; the pair (N, 1) fails and is consumed,
        // so "E 1" supplies the direction and start.
        let s = parse_scenario("1001 3 4 3 3 N 1 E 1").unwrap();
        assert!(s.header_reinterpreted);
        assert!(s.truncated);
        assert_eq!(s.points, vec![GridPoint::new(3, 4), GridPoint::new(3, 3)]);
        assert_eq!(s.incoming, Direction::E);
        assert_eq!(s.declared, 1001);
    }

    #[test]
    fn reinterpreted_header_reads_every_point() {
        let mut text = String::from("1001");
        for i in 0..1001 {
            text.push_str(&format!(" {i} {}", -i));
        }
        text.push_str(" SE 1001");

        let s = parse_scenario(&text).unwrap();
        assert!(s.header_reinterpreted);
        assert!(!s.truncated);
        assert_eq!(s.declared, 1001);
        assert_eq!(s.points.len(), 1001);
        assert_eq!(s.points[0], GridPoint::new(0, 0));
        assert_eq!(s.points[1000], GridPoint::new(1000, -1000));
        assert_eq!(s.incoming, Direction::SE);
        assert_eq!(s.start, PointId(1001));
    }

    #[test]
    fn truncation_consumes_the_failed_pair() {
        let s = parse_scenario("1 5 0 0 1 1 bad 7 W 2").unwrap();
        assert!(s.truncated);
        assert_eq!(s.points.len(), 2);
        assert_eq!(s.incoming, Direction::W);
        assert_eq!(s.start, PointId(2));
    }

    #[test]
    fn truncation_usually_swallows_the_direction() {
        let err = parse_scenario("1 3 0 0 N 1").unwrap_err();
        assert_eq!(err, ParseError::MissingDirection);
    }

    #[test]
    fn non_numeric_count_reads_no_points() {
        let err = parse_scenario("1 x N 1").unwrap_err();
        assert_eq!(err, ParseError::StartOutOfRange { start: 1, points: 0 });
    }

    #[test]
    fn too_few_tokens() {
        assert_eq!(parse_scenario("").unwrap_err(), ParseError::TooFewTokens(0));
        assert_eq!(parse_scenario(" 7 ").unwrap_err(), ParseError::TooFewTokens(1));
    }

    #[test]
    fn unknown_direction() {
        let err = parse_scenario("1 1 0 0 UP 1").unwrap_err();
        assert!(matches!(err, ParseError::UnknownDirection(_)));
    }

    #[test]
    fn bad_start_index() {
        assert_eq!(
            parse_scenario("1 1 0 0 N").unwrap_err(),
            ParseError::MissingStart
        );
        assert_eq!(
            parse_scenario("1 1 0 0 N first").unwrap_err(),
            ParseError::InvalidStart("first".into())
        );
        assert_eq!(
            parse_scenario("1 1 0 0 N 2").unwrap_err(),
            ParseError::StartOutOfRange { start: 2, points: 1 }
        );
        assert_eq!(
            parse_scenario("1 1 0 0 N 0").unwrap_err(),
            ParseError::StartOutOfRange { start: 0, points: 1 }
        );
    }

    #[test]
    fn lenient_numbers() {
        let s = parse_scenario("1 2 0.5 0 3px 0 E 1.0").unwrap();
        assert_eq!(s.points, vec![GridPoint::new(0, 0), GridPoint::new(3, 0)]);
        assert_eq!(s.start, PointId(1));
    }

    #[test]
    fn scenario_builds_state() {
        let state = parse_scenario("1 2 0 0 0 5 N 2")
            .unwrap()
            .into_state()
            .unwrap();
        assert_eq!(state.current(), 1);
        assert_eq!(state.incoming(), Direction::N);
        assert!(state.is_running());
    }

    #[test]
    fn scenario_builds_state_with_capacity() {
        let state = parse_scenario("1 2 0 0 0 5 N 1")
            .unwrap()
            .into_state_with_capacity(4)
            .unwrap();
        assert_eq!(state.history().capacity(), 4);
    }
}
