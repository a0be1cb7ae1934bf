use crate::ball::PlayerId;

/// Longest name kept after trimming, in characters.
pub const MAX_NAME_CHARS: usize = 24;

/// Longest colour string kept after trimming, in characters.
const MAX_COLOUR_CHARS: usize = 32;

/// A player and their session bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    /// Secret handed to the client so a reconnect resumes this player.
    pub token: String,
    pub name: String,
    pub colour: String,
    pub score: u32,
    /// Open connections presenting this player's token.
    pub connections: u32,
    /// Set once the player has sent `playerinfo`.
    pub registered: bool,
}

impl Player {
    pub fn new(id: PlayerId, token: String) -> Self {
        Self {
            id,
            token,
            name: default_name(id),
            colour: colour_from_id(id),
            score: 0,
            connections: 0,
            registered: false,
        }
    }

    /// Listed in `playerlist` and simulated.
    pub fn is_active(&self) -> bool {
        self.registered && self.connections > 0
    }

    pub fn set_info(&mut self, name: &str, colour: &str) {
        self.name = sanitize_name(name, self.id);
        self.colour = sanitize_colour(colour, self.id);
    }
}

fn default_name(id: PlayerId) -> String {
    format!("Player {}", id)
}

pub fn sanitize_name(raw: &str, id: PlayerId) -> String {
    let name: String = raw.trim().chars().take(MAX_NAME_CHARS).collect();
    let name = name.trim_end().to_string();
    if name.is_empty() {
        default_name(id)
    } else {
        name
    }
}

pub fn sanitize_colour(raw: &str, id: PlayerId) -> String {
    let colour: String = raw.trim().chars().take(MAX_COLOUR_CHARS).collect();
    if colour.is_empty() {
        colour_from_id(id)
    } else {
        colour
    }
}

/// Generate a `#rrggbb` colour from player ID using golden angle hue distribution.
pub fn colour_from_id(id: PlayerId) -> String {
    let hue = id.wrapping_mul(137) % 360;
    format!("#{:06x}", hsv_to_rgb(hue as f64, 0.55, 0.95))
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> u32 {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let ri = ((r + m) * 255.0).round() as u32;
    let gi = ((g + m) * 255.0).round() as u32;
    let bi = ((b + m) * 255.0).round() as u32;

    (ri << 16) | (gi << 8) | bi
}
