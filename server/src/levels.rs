//! Built-in course and course-file loading.

use std::path::{Path, PathBuf};

use minigolf_shared::level::{Booster, Direction, Level, LevelError, Segment, Slope, Wall};
use minigolf_shared::vec2::vec2;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read course file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Read and validate a JSON course file.
pub fn load_level(path: &Path) -> Result<Level, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Level::from_json(&json)?)
}

fn wall(x1: f64, y1: f64, x2: f64, y2: f64) -> Wall {
    Wall::Static(Segment::new(vec2(x1, y1), vec2(x2, y2)))
}

/// Triangular course with a diamond island in the middle and a downhill
/// strip along the bottom edge. Angled walls are all at 45°.
pub fn default_course() -> Level {
    Level {
        walls: vec![
            // outline
            wall(0.0, 0.0, 1000.0, 0.0),
            wall(1000.0, 0.0, 1000.0, 600.0),
            wall(1000.0, 600.0, 600.0, 600.0),
            wall(600.0, 600.0, 0.0, 0.0),
            // diamond
            wall(400.0, 250.0, 500.0, 350.0),
            wall(500.0, 350.0, 600.0, 250.0),
            wall(600.0, 250.0, 500.0, 150.0),
            wall(500.0, 150.0, 400.0, 250.0),
            // gate sliding down beside the diamond
            Wall::Moving {
                from: Segment::new(vec2(700.0, 300.0), vec2(800.0, 300.0)),
                to: Segment::new(vec2(700.0, 400.0), vec2(800.0, 400.0)),
            },
        ],
        pegs: vec![vec2(300.0, 100.0), vec2(800.0, 150.0)],
        slopes: vec![Slope {
            origin: vec2(600.0, 450.0),
            size: vec2(400.0, 150.0),
            direction: Direction::Down,
        }],
        boosters: vec![Booster {
            center: vec2(350.0, 120.0),
            direction: Direction::Right,
        }],
        hole: Some(vec2(900.0, 100.0)),
        spawn: vec2(150.0, 60.0),
    }
}
