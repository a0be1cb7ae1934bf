//! Wire messages and conversions from server state.

pub use minigolf_shared::protocol::*;

use crate::ball::Ball;
use crate::player::Player;

/// Round to 4 decimal places (well below a pixel, keeps tick JSON short)
#[inline]
fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}

pub fn ball_wire(ball: &Ball) -> BallStateWire {
    BallStateWire {
        position: [round4(ball.position.x), round4(ball.position.y)],
        velocity: [round4(ball.velocity.x), round4(ball.velocity.y)],
    }
}

pub fn player_wire(player: &Player) -> PlayerWire {
    PlayerWire {
        id: player.id,
        name: player.name.clone(),
        colour: player.colour.clone(),
        score: player.score,
    }
}

/// Serialize for a text frame.
pub fn encode(msg: &ServerMsg) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}
