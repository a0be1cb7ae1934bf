use minigolf_shared::config::PhysicsConfig;
use minigolf_shared::level::Level;
use minigolf_shared::vec2::Vec2;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

use crate::ball::{Ball, BallRegistry, PlayerId};
use crate::player::Player;
use crate::protocol::{
    ball_wire, player_wire, JoinMsg, PlayerListMsg, ScoreMsg, TickMsg, PROTOCOL_VERSION,
};
use crate::scheduler::{NetworkCadence, WallMotion};

/// Spacing along x between consecutive spawned balls.
const SPAWN_SPACING: f64 = 50.0;
/// Spawn offsets cycle after this many balls.
const SPAWN_SLOTS: usize = 8;
/// Longest accepted putt aim vector, before scaling by putt power.
const MAX_PUTT_LENGTH: f64 = 1.0;

/// Result of attaching a connection to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connected {
    pub player_id: PlayerId,
    /// The presented token matched an existing player.
    pub resumed: bool,
    /// The active roster changed and a `playerlist` is due.
    pub roster_changed: bool,
}

/// What one physics tick produced for broadcasting.
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub scores: Vec<ScoreMsg>,
    /// Present on network ticks.
    pub snapshot: Option<TickMsg>,
}

/// Central game state owned by the game loop task.
pub struct GameState {
    pub level: Level,
    pub physics: PhysicsConfig,
    pub balls: BallRegistry,
    pub players: BTreeMap<PlayerId, Player>,
    tokens: HashMap<String, PlayerId>,
    next_player_id: PlayerId,
    wall_motion: WallMotion,
    cadence: NetworkCadence,
}

fn new_token() -> String {
    format!("{:032x}", rand::thread_rng().gen::<u128>())
}

impl GameState {
    pub fn new(level: Level, physics: PhysicsConfig, network_tick_every: u32) -> Self {
        Self {
            level,
            physics,
            balls: BallRegistry::new(),
            players: BTreeMap::new(),
            tokens: HashMap::new(),
            next_player_id: 1,
            wall_motion: WallMotion::new(physics.wall_half_period),
            cadence: NetworkCadence::new(network_tick_every),
        }
    }

    /// Attach a connection. A known token resumes its player; anything else
    /// creates a fresh player with a new token.
    pub fn connect(&mut self, token: Option<&str>) -> Connected {
        let known = token.and_then(|t| self.tokens.get(t).copied());
        if let Some(id) = known {
            if let Some(player) = self.players.get_mut(&id) {
                let was_active = player.is_active();
                player.connections += 1;
                let now_active = player.is_active();
                if now_active {
                    if let Some(ball) = self.balls.get_mut(id) {
                        ball.hidden = false;
                    }
                }
                return Connected {
                    player_id: id,
                    resumed: true,
                    roster_changed: was_active != now_active,
                };
            }
        }

        let id = self.next_player_id;
        self.next_player_id += 1;

        let mut token = new_token();
        while self.tokens.contains_key(&token) {
            token = new_token();
        }
        self.tokens.insert(token.clone(), id);

        let mut player = Player::new(id, token);
        player.connections = 1;
        self.players.insert(id, player);

        Connected {
            player_id: id,
            resumed: false,
            roster_changed: false,
        }
    }

    /// Apply `playerinfo`: set name and colour, create the ball on first
    /// registration. Returns false for an unknown player.
    pub fn register(&mut self, id: PlayerId, name: &str, colour: &str) -> bool {
        let Some(player) = self.players.get_mut(&id) else {
            return false;
        };
        player.set_info(name, colour);
        player.registered = true;
        let visible = player.is_active();

        if !self.balls.contains(id) {
            let slot = self.balls.len() % SPAWN_SLOTS;
            let position = self.level.spawn + Vec2::new(SPAWN_SPACING * slot as f64, 0.0);
            self.balls
                .insert(Ball::new(id, position, self.physics.ball_radius));
        }
        if let Some(ball) = self.balls.get_mut(id) {
            ball.hidden = !visible;
        }
        true
    }

    /// Add a scaled impulse to the player's ball. Aim vectors longer than
    /// `MAX_PUTT_LENGTH` are shortened to it first. Returns false if ignored.
    pub fn putt(&mut self, id: PlayerId, vec: [f64; 2]) -> bool {
        let aim = Vec2::from(vec);
        if !aim.is_finite() {
            return false;
        }
        // hypot does not overflow for large finite components
        let length = aim.x.hypot(aim.y);
        let aim = if length > MAX_PUTT_LENGTH {
            aim * (MAX_PUTT_LENGTH / length)
        } else {
            aim
        };
        match self.balls.get_mut(id) {
            Some(ball) if !ball.hidden => {
                let velocity = ball.velocity + aim * self.physics.putt_power;
                if !velocity.is_finite() {
                    return false;
                }
                ball.velocity = velocity;
                true
            }
            _ => false,
        }
    }

    /// Detach one connection. Returns true if the active roster changed.
    pub fn disconnect(&mut self, id: PlayerId) -> bool {
        let Some(player) = self.players.get_mut(&id) else {
            return false;
        };
        let was_active = player.is_active();
        player.connections = player.connections.saturating_sub(1);
        if player.connections > 0 {
            return false;
        }

        if player.registered {
            if let Some(ball) = self.balls.get_mut(id) {
                ball.hidden = true;
            }
        } else {
            // Nothing to resume for a player that never registered.
            let token = player.token.clone();
            self.players.remove(&id);
            self.tokens.remove(&token);
        }
        was_active
    }

    /// Active players in id order.
    pub fn player_list(&self) -> PlayerListMsg {
        PlayerListMsg {
            players: self
                .players
                .values()
                .filter(|p| p.is_active())
                .map(player_wire)
                .collect(),
        }
    }

    pub fn join_msg(&self, id: PlayerId) -> Option<JoinMsg> {
        let player = self.players.get(&id)?;
        Some(JoinMsg {
            protocol_version: PROTOCOL_VERSION,
            token: player.token.clone(),
            self_id: id,
            level: self.level.to_wire(),
            players: self.player_list().players,
            physics: self.physics,
        })
    }

    pub fn snapshot(&self) -> TickMsg {
        TickMsg {
            balls: self
                .balls
                .visible()
                .map(|ball| (ball.id.to_string(), ball_wire(ball)))
                .collect(),
            lerp: self.wall_motion.phase(),
        }
    }

    /// One physics tick: step every ball against the current wall
    /// positions, score sinks, then advance both counters.
    pub fn tick(&mut self) -> TickOutcome {
        let sinks = self
            .balls
            .step_all(&self.level, self.wall_motion.fraction(), &self.physics);

        let mut outcome = TickOutcome::default();
        for sink in sinks {
            if let Some(player) = self.players.get_mut(&sink.player_id) {
                player.score += 1;
                tracing::debug!("Player {} sank, score {}", player.id, player.score);
                outcome.scores.push(ScoreMsg {
                    player: player.id,
                    score: player.score,
                });
            }
        }

        self.wall_motion.advance();
        if self.cadence.advance() {
            outcome.snapshot = Some(self.snapshot());
        }
        outcome
    }

    pub fn wall_phase(&self) -> i32 {
        self.wall_motion.phase()
    }

    pub fn player_id_for_token(&self, token: &str) -> Option<PlayerId> {
        self.tokens.get(token).copied()
    }
}
