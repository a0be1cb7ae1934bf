use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PhysicsConfig;
use crate::level::LevelWire;

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

// === Server -> Client ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum ServerMsg {
    #[serde(rename = "join")]
    Join(JoinMsg),
    #[serde(rename = "playerlist")]
    PlayerList(PlayerListMsg),
    #[serde(rename = "tick")]
    Tick(TickMsg),
    #[serde(rename = "score")]
    Score(ScoreMsg),
}

/// Sent once per connection: the whole course plus who is playing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct JoinMsg {
    pub protocol_version: u32,
    /// Present it as `?token=` on reconnect to resume this player.
    pub token: String,
    pub self_id: u32,
    #[serde(flatten)]
    pub level: LevelWire,
    pub players: Vec<PlayerWire>,
    pub physics: PhysicsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerListMsg {
    pub players: Vec<PlayerWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerWire {
    pub id: u32,
    pub name: String,
    pub colour: String,
    pub score: u32,
}

/// Throttled state snapshot. Keys are player ids in decimal.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TickMsg {
    pub balls: BTreeMap<String, BallStateWire>,
    /// Wall-motion phase in `[-wallHalfPeriod, wallHalfPeriod)`; walls sit
    /// at fraction `|lerp| / wallHalfPeriod` between their two configs.
    pub lerp: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BallStateWire {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreMsg {
    pub player: u32,
    pub score: u32,
}

// === Client -> Server ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum ClientMsg {
    #[serde(rename = "playerinfo")]
    PlayerInfo { name: String, colour: String },
    #[serde(rename = "putt")]
    Putt { vec: [f64; 2] },
}

impl ClientMsg {
    /// Parse an inbound frame. Unparseable payloads and unknown tags give `None`.
    pub fn parse(text: &str) -> Option<ClientMsg> {
        serde_json::from_str(text).ok()
    }
}
