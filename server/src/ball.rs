use minigolf_shared::config::PhysicsConfig;
use minigolf_shared::level::Level;
use minigolf_shared::vec2::Vec2;
use std::collections::BTreeMap;

use crate::collision;

pub type PlayerId = u32;

/// One player's ball.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: PlayerId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    /// Set while the owning player is disconnected. Hidden balls keep their
    /// position but are not simulated, collided with, or broadcast.
    pub hidden: bool,
    /// Whether the ball was inside the hole's capture radius last tick.
    in_hole: bool,
}

/// A ball entered the hole's capture radius this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkEvent {
    pub player_id: PlayerId,
}

impl Ball {
    pub fn new(id: PlayerId, position: Vec2, radius: f64) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            radius,
            hidden: false,
            in_hole: false,
        }
    }

    pub fn is_resting(&self) -> bool {
        self.velocity == Vec2::ZERO
    }

    pub fn in_hole(&self) -> bool {
        self.in_hole
    }
}

/// Apply slopes (accelerate, stacking) then boosters (overwrite velocity,
/// last one wins). Returns true if a booster imposed the velocity.
pub fn apply_zone_effects(ball: &mut Ball, level: &Level, config: &PhysicsConfig) -> bool {
    for slope in &level.slopes {
        if slope.contains(ball.position) {
            ball.velocity += slope.direction.vector(config.slope_acceleration);
        }
    }

    let mut boosted = false;
    for booster in &level.boosters {
        if booster.contains(ball.position, config.booster_half_extent) {
            ball.velocity = booster.direction.vector(config.booster_speed);
            boosted = true;
        }
    }
    boosted
}

/// Advance one ball by one tick against the level and every other ball.
///
/// Zone effects, then (if moving) integration, ball/wall/peg passes and
/// friction, then the hole check. A booster tick skips friction so the
/// imposed velocity survives the tick unchanged. Sinking is reported once per
/// entry into the capture radius, not on every tick spent inside it.
pub fn tick_ball(
    ball: &mut Ball,
    others: &mut BTreeMap<PlayerId, Ball>,
    level: &Level,
    wall_fraction: f64,
    config: &PhysicsConfig,
) -> Option<SinkEvent> {
    let boosted = apply_zone_effects(ball, level, config);

    if !ball.is_resting() {
        let mut candidate = ball.position + ball.velocity;
        candidate = collision::collide_with_balls(
            ball,
            candidate,
            others.values_mut().filter(|other| !other.hidden),
        );

        let shift_factor = config.shift_factor(ball.radius);
        candidate = collision::collide_with_walls(
            ball.position,
            candidate,
            &mut ball.velocity,
            &level.walls,
            wall_fraction,
            shift_factor,
            config.corner_margin,
        );
        candidate = collision::collide_with_pegs(candidate, &mut ball.velocity, &level.pegs, shift_factor);
        ball.position = candidate;

        if !boosted {
            ball.velocity.scale_in_place(config.friction);
        }
        if ball.velocity.length_squared() < config.rest_epsilon {
            ball.velocity = Vec2::ZERO;
        }
    }

    let inside = level.hole.is_some_and(|hole| {
        (ball.position - hole).length_squared() < config.hole_radius * config.hole_radius
    });
    let sunk = inside && !ball.in_hole;
    ball.in_hole = inside;
    sunk.then_some(SinkEvent { player_id: ball.id })
}

/// All balls of the process, keyed by player id. Iteration (and therefore
/// tick order) is by ascending id.
#[derive(Debug, Default)]
pub struct BallRegistry {
    balls: BTreeMap<PlayerId, Ball>,
}

impl BallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ball: Ball) {
        self.balls.insert(ball.id, ball);
    }

    pub fn get(&self, id: PlayerId) -> Option<&Ball> {
        self.balls.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Ball> {
        self.balls.get_mut(&id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.balls.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Balls that are simulated and broadcast.
    pub fn visible(&self) -> impl Iterator<Item = &Ball> {
        self.balls.values().filter(|b| !b.hidden)
    }

    /// Run the tick step for every visible ball. Each ball sees the others in
    /// their state after the balls before it were stepped.
    pub fn step_all(
        &mut self,
        level: &Level,
        wall_fraction: f64,
        config: &PhysicsConfig,
    ) -> Vec<SinkEvent> {
        let ids: Vec<PlayerId> = self.balls.keys().copied().collect();
        let mut sinks = Vec::new();

        for id in ids {
            let Some(mut ball) = self.balls.remove(&id) else {
                continue;
            };
            if !ball.hidden {
                if let Some(sink) = tick_ball(&mut ball, &mut self.balls, level, wall_fraction, config) {
                    sinks.push(sink);
                }
            }
            self.balls.insert(id, ball);
        }

        sinks
    }
}
