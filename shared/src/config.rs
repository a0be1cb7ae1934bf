/// Gameplay tuning shared by the simulation and the clients that render it.
///
/// Units are world units and ticks; velocities are world units per tick.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsConfig {
    pub ball_radius: f64,
    /// Half the drawn wall width; added to the ball radius to get the shift factor.
    pub wall_margin: f64,
    /// Extra bounding-box tolerance for angled walls so balls cannot slip
    /// through the joint between two of them.
    pub corner_margin: f64,
    /// Velocity multiplier applied once per tick while moving.
    pub friction: f64,
    /// Below this speed squared a ball snaps to rest.
    pub rest_epsilon: f64,
    /// Scale applied to a client putt vector.
    pub putt_power: f64,
    pub slope_acceleration: f64,
    pub booster_speed: f64,
    pub booster_half_extent: f64,
    pub hole_radius: f64,
    /// Ticks for the wall-motion phase to sweep from 0 to its turnaround.
    pub wall_half_period: i32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ball_radius: 20.0,
            wall_margin: 12.0,
            corner_margin: 8.0,
            friction: 0.99,
            rest_epsilon: 0.001,
            putt_power: 40.0,
            slope_acceleration: 0.08,
            booster_speed: 20.0,
            booster_half_extent: 20.0,
            hole_radius: 20.0,
            wall_half_period: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid physics config: {0}")]
pub struct ConfigError(pub &'static str);

impl PhysicsConfig {
    /// Ball radius plus wall margin: collision tolerance and bounce clearance.
    pub fn shift_factor(&self, radius: f64) -> f64 {
        radius + self.wall_margin
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            (self.ball_radius, "ball_radius must be finite and > 0"),
            (self.putt_power, "putt_power must be finite and > 0"),
            (self.booster_half_extent, "booster_half_extent must be finite and > 0"),
            (self.hole_radius, "hole_radius must be finite and > 0"),
            (self.rest_epsilon, "rest_epsilon must be finite and > 0"),
        ];
        for (value, msg) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError(msg));
            }
        }
        let non_negative = [
            (self.wall_margin, "wall_margin must be finite and >= 0"),
            (self.corner_margin, "corner_margin must be finite and >= 0"),
            (self.slope_acceleration, "slope_acceleration must be finite and >= 0"),
            (self.booster_speed, "booster_speed must be finite and >= 0"),
        ];
        for (value, msg) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError(msg));
            }
        }
        if !self.friction.is_finite() || self.friction <= 0.0 || self.friction >= 1.0 {
            return Err(ConfigError("friction must be in (0, 1)"));
        }
        if self.wall_half_period <= 0 {
            return Err(ConfigError("wall_half_period must be > 0"));
        }
        Ok(())
    }
}
