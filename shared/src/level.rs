//! Course geometry.
//!
//! `LevelWire` is the flat, array-based form used on the wire and in course
//! files. `Level` is the validated, typed form the simulation runs against.
//! A `Level` is immutable; a course change replaces it wholesale.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::vec2::{Axis, Vec2};

/// Spawn point used when a course does not name one.
pub const DEFAULT_SPAWN: Vec2 = Vec2::new(50.0, 50.0);

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("invalid direction {0}, expected 0, 1, 2 or 3")]
    InvalidDirection(f64),
    #[error("wall {0} has coincident endpoints")]
    DegenerateWall(usize),
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
    #[error("slope {0} has a non-positive size")]
    EmptySlope(usize),
    #[error("invalid course json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Quarter-turn direction for slopes and boosters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn quarter_turns(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// `magnitude` pointing in this direction (screen coordinates, y down).
    pub fn vector(self, magnitude: f64) -> Vec2 {
        Vec2::new(0.0, -magnitude).rotate_quarter_turns(self.quarter_turns())
    }

    fn from_wire(raw: f64) -> Result<Self, LevelError> {
        if raw == 0.0 {
            Ok(Direction::Up)
        } else if raw == 1.0 {
            Ok(Direction::Right)
        } else if raw == 2.0 {
            Ok(Direction::Down)
        } else if raw == 3.0 {
            Ok(Direction::Left)
        } else {
            Err(LevelError::InvalidDirection(raw))
        }
    }

    fn to_wire(self) -> f64 {
        self.quarter_turns() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// The axis this segment is perpendicular to, if it is axis-aligned.
    /// A vertical wall (shared x) is perpendicular to `Axis::X`.
    pub fn perpendicular_axis(&self) -> Option<Axis> {
        Axis::BOTH
            .into_iter()
            .find(|&axis| self.start.get(axis) == self.end.get(axis))
    }

    pub fn lerp(&self, to: &Segment, t: f64) -> Segment {
        Segment {
            start: self.start.lerp(to.start, t),
            end: self.end.lerp(to.end, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wall {
    Static(Segment),
    /// Interpolated between `from` (fraction 0) and `to` (fraction 1).
    Moving { from: Segment, to: Segment },
}

impl Wall {
    /// Effective segment for a wall-motion fraction in `[0, 1]`.
    pub fn segment_at(&self, fraction: f64) -> Segment {
        match self {
            Wall::Static(segment) => *segment,
            Wall::Moving { from, to } => from.lerp(to, fraction),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slope {
    pub origin: Vec2,
    pub size: Vec2,
    pub direction: Direction,
}

impl Slope {
    pub fn contains(&self, p: Vec2) -> bool {
        self.origin.x < p.x
            && self.origin.y < p.y
            && p.x < self.origin.x + self.size.x
            && p.y < self.origin.y + self.size.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Booster {
    pub center: Vec2,
    pub direction: Direction,
}

impl Booster {
    pub fn contains(&self, p: Vec2, half_extent: f64) -> bool {
        (p.x - self.center.x).abs() < half_extent && (p.y - self.center.y).abs() < half_extent
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub walls: Vec<Wall>,
    pub pegs: Vec<Vec2>,
    pub slopes: Vec<Slope>,
    pub boosters: Vec<Booster>,
    pub hole: Option<Vec2>,
    pub spawn: Vec2,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            walls: Vec::new(),
            pegs: Vec::new(),
            slopes: Vec::new(),
            boosters: Vec::new(),
            hole: None,
            spawn: DEFAULT_SPAWN,
        }
    }
}

/// Course in wire form. Static walls are `[x1, y1, x2, y2]`, moving walls
/// are two such segments back to back, slopes `[x, y, w, h, direction]`,
/// boosters `[x, y, direction]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LevelWire {
    #[serde(default)]
    pub geo: Vec<[f64; 4]>,
    #[serde(default)]
    pub mv_walls: Vec<[f64; 8]>,
    #[serde(default)]
    pub pegs: Vec<[f64; 2]>,
    #[serde(default)]
    pub slopes: Vec<[f64; 5]>,
    #[serde(default)]
    pub boosters: Vec<[f64; 3]>,
    #[serde(default)]
    pub hole: Option<[f64; 2]>,
    #[serde(default)]
    pub spawn: Option<[f64; 2]>,
}

fn finite(values: &[f64], what: &'static str) -> Result<(), LevelError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(LevelError::NonFinite(what))
    }
}

fn segment(raw: &[f64]) -> Segment {
    Segment::new(Vec2::new(raw[0], raw[1]), Vec2::new(raw[2], raw[3]))
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let wire: LevelWire = serde_json::from_str(json)?;
        Level::from_wire(&wire)
    }

    /// Validate and convert a wire course. Static walls come first in the
    /// resulting wall order, then moving walls.
    pub fn from_wire(wire: &LevelWire) -> Result<Self, LevelError> {
        let mut walls = Vec::with_capacity(wire.geo.len() + wire.mv_walls.len());

        for raw in &wire.geo {
            finite(raw, "wall")?;
            let seg = segment(raw);
            if seg.is_degenerate() {
                return Err(LevelError::DegenerateWall(walls.len()));
            }
            walls.push(Wall::Static(seg));
        }

        for raw in &wire.mv_walls {
            finite(raw, "moving wall")?;
            let from = segment(&raw[0..4]);
            let to = segment(&raw[4..8]);
            if from.is_degenerate() || to.is_degenerate() {
                return Err(LevelError::DegenerateWall(walls.len()));
            }
            walls.push(Wall::Moving { from, to });
        }

        let mut pegs = Vec::with_capacity(wire.pegs.len());
        for raw in &wire.pegs {
            finite(raw, "peg")?;
            pegs.push(Vec2::from(*raw));
        }

        let mut slopes = Vec::with_capacity(wire.slopes.len());
        for (i, raw) in wire.slopes.iter().enumerate() {
            finite(raw, "slope")?;
            if raw[2] <= 0.0 || raw[3] <= 0.0 {
                return Err(LevelError::EmptySlope(i));
            }
            slopes.push(Slope {
                origin: Vec2::new(raw[0], raw[1]),
                size: Vec2::new(raw[2], raw[3]),
                direction: Direction::from_wire(raw[4])?,
            });
        }

        let mut boosters = Vec::with_capacity(wire.boosters.len());
        for raw in &wire.boosters {
            finite(raw, "booster")?;
            boosters.push(Booster {
                center: Vec2::new(raw[0], raw[1]),
                direction: Direction::from_wire(raw[2])?,
            });
        }

        let hole = match wire.hole {
            Some(raw) => {
                finite(&raw, "hole")?;
                Some(Vec2::from(raw))
            }
            None => None,
        };

        let spawn = match wire.spawn {
            Some(raw) => {
                finite(&raw, "spawn")?;
                Vec2::from(raw)
            }
            None => DEFAULT_SPAWN,
        };

        Ok(Level {
            walls,
            pegs,
            slopes,
            boosters,
            hole,
            spawn,
        })
    }

    pub fn to_wire(&self) -> LevelWire {
        let mut wire = LevelWire::default();
        for wall in &self.walls {
            match wall {
                Wall::Static(s) => wire.geo.push([s.start.x, s.start.y, s.end.x, s.end.y]),
                Wall::Moving { from, to } => wire.mv_walls.push([
                    from.start.x,
                    from.start.y,
                    from.end.x,
                    from.end.y,
                    to.start.x,
                    to.start.y,
                    to.end.x,
                    to.end.y,
                ]),
            }
        }
        wire.pegs = self.pegs.iter().map(|p| p.to_array()).collect();
        wire.slopes = self
            .slopes
            .iter()
            .map(|s| {
                [
                    s.origin.x,
                    s.origin.y,
                    s.size.x,
                    s.size.y,
                    s.direction.to_wire(),
                ]
            })
            .collect();
        wire.boosters = self
            .boosters
            .iter()
            .map(|b| [b.center.x, b.center.y, b.direction.to_wire()])
            .collect();
        wire.hole = self.hole.map(Vec2::to_array);
        wire.spawn = Some(self.spawn.to_array());
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec2::vec2;

    const COURSE: &str = r#"{
        "geo": [[0, 0, 1000, 0], [1000, 0, 1000, 600], [600, 600, 0, 0]],
        "mvWalls": [[400, 100, 400, 200, 500, 100, 500, 200]],
        "pegs": [[300, 300]],
        "slopes": [[600, 450, 400, 150, 2]],
        "boosters": [[800, 100, 3]],
        "hole": [900, 500]
    }"#;

    #[test]
    fn parses_course_json() {
        let level = Level::from_json(COURSE).unwrap();
        assert_eq!(level.walls.len(), 4);
        assert!(matches!(level.walls[0], Wall::Static(_)));
        assert!(matches!(level.walls[3], Wall::Moving { .. }));
        assert_eq!(level.pegs, vec![vec2(300.0, 300.0)]);
        assert_eq!(level.slopes[0].direction, Direction::Down);
        assert_eq!(level.boosters[0].direction, Direction::Left);
        assert_eq!(level.hole, Some(vec2(900.0, 500.0)));
        assert_eq!(level.spawn, DEFAULT_SPAWN);
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let level = Level::from_json(r#"{"geo": [[0, 0, 10, 0]]}"#).unwrap();
        assert_eq!(level.walls.len(), 1);
        assert!(level.pegs.is_empty());
        assert!(level.hole.is_none());
    }

    #[test]
    fn wire_conversion_keeps_geometry() {
        let level = Level::from_json(COURSE).unwrap();
        let again = Level::from_wire(&level.to_wire()).unwrap();
        assert_eq!(level, again);
    }

    #[test]
    fn rejects_coincident_wall_endpoints() {
        let err = Level::from_json(r#"{"geo": [[0, 0, 10, 0], [5, 5, 5, 5]]}"#).unwrap_err();
        assert!(matches!(err, LevelError::DegenerateWall(1)));

        let err =
            Level::from_json(r#"{"mvWalls": [[0, 0, 10, 0, 3, 3, 3, 3]]}"#).unwrap_err();
        assert!(matches!(err, LevelError::DegenerateWall(0)));
    }

    #[test]
    fn rejects_bad_direction() {
        let err = Level::from_json(r#"{"boosters": [[0, 0, 4]]}"#).unwrap_err();
        assert!(matches!(err, LevelError::InvalidDirection(d) if d == 4.0));
        let err = Level::from_json(r#"{"slopes": [[0, 0, 10, 10, 1.5]]}"#).unwrap_err();
        assert!(matches!(err, LevelError::InvalidDirection(_)));
    }

    #[test]
    fn rejects_empty_slope() {
        let err = Level::from_json(r#"{"slopes": [[0, 0, 0, 10, 1]]}"#).unwrap_err();
        assert!(matches!(err, LevelError::EmptySlope(0)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Level::from_json("{\"geo\": [[1, 2, 3]]}"),
            Err(LevelError::Json(_))
        ));
    }

    #[test]
    fn moving_wall_interpolates_between_configs() {
        let from = Segment::new(vec2(400.0, 100.0), vec2(400.0, 200.0));
        let to = Segment::new(vec2(500.0, 100.0), vec2(500.0, 200.0));
        let wall = Wall::Moving { from, to };
        assert_eq!(wall.segment_at(0.0), from);
        assert_eq!(wall.segment_at(1.0), to);
        assert_eq!(
            wall.segment_at(0.5),
            Segment::new(vec2(450.0, 100.0), vec2(450.0, 200.0))
        );
    }

    #[test]
    fn static_wall_ignores_fraction() {
        let seg = Segment::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
        assert_eq!(Wall::Static(seg).segment_at(0.7), seg);
    }

    #[test]
    fn perpendicular_axis_detection() {
        let vertical = Segment::new(vec2(500.0, 0.0), vec2(500.0, 300.0));
        let horizontal = Segment::new(vec2(0.0, 20.0), vec2(90.0, 20.0));
        let diagonal = Segment::new(vec2(0.0, 0.0), vec2(100.0, 100.0));
        assert_eq!(vertical.perpendicular_axis(), Some(Axis::X));
        assert_eq!(horizontal.perpendicular_axis(), Some(Axis::Y));
        assert_eq!(diagonal.perpendicular_axis(), None);
    }

    #[test]
    fn zone_containment_is_strict() {
        let slope = Slope {
            origin: vec2(0.0, 0.0),
            size: vec2(100.0, 50.0),
            direction: Direction::Up,
        };
        assert!(slope.contains(vec2(50.0, 25.0)));
        assert!(!slope.contains(vec2(0.0, 25.0)));
        assert!(!slope.contains(vec2(100.0, 25.0)));

        let booster = Booster {
            center: vec2(100.0, 100.0),
            direction: Direction::Right,
        };
        assert!(booster.contains(vec2(119.0, 81.0), 20.0));
        assert!(!booster.contains(vec2(120.0, 100.0), 20.0));
    }

    #[test]
    fn direction_vectors() {
        assert_eq!(Direction::Up.vector(2.0), vec2(0.0, -2.0));
        assert_eq!(Direction::Right.vector(2.0), vec2(2.0, 0.0));
        assert_eq!(Direction::Down.vector(2.0), vec2(0.0, 2.0));
        assert_eq!(Direction::Left.vector(2.0), vec2(-2.0, 0.0));
    }
}
