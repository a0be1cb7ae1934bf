//! Explicit counters driven once per physics tick.

/// Triangle-wave phase shared by every moving wall.
///
/// The phase `t` climbs from `-half_period` to `half_period - 1` and wraps;
/// walls sit at fraction `|t| / half_period` between their two
/// configurations, so they sweep out and back with no per-wall state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallMotion {
    t: i32,
    half_period: i32,
}

impl WallMotion {
    /// Starts at phase 0, where every moving wall is at its start config.
    pub fn new(half_period: i32) -> Self {
        Self {
            t: 0,
            half_period: half_period.max(1),
        }
    }

    pub fn advance(&mut self) {
        self.t += 1;
        if self.t >= self.half_period {
            self.t = -self.half_period;
        }
    }

    pub fn phase(&self) -> i32 {
        self.t
    }

    pub fn fraction(&self) -> f64 {
        self.t.unsigned_abs() as f64 / self.half_period as f64
    }
}

/// Network tick throttle: fires on every `every`-th physics tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkCadence {
    counter: u32,
    every: u32,
}

impl NetworkCadence {
    pub fn new(every: u32) -> Self {
        Self {
            counter: 0,
            every: every.max(1),
        }
    }

    /// Count one physics tick. Returns true when a snapshot is due.
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.every {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wall_motion_starts_at_start_config() {
        let motion = WallMotion::new(200);
        assert_eq!(motion.phase(), 0);
        assert_eq!(motion.fraction(), 0.0);
    }

    #[test]
    fn wall_motion_turns_around_at_full_extent() {
        let mut motion = WallMotion::new(4);
        let phases: Vec<i32> = (0..9)
            .map(|_| {
                motion.advance();
                motion.phase()
            })
            .collect();
        assert_eq!(phases, vec![1, 2, 3, -4, -3, -2, -1, 0, 1]);
    }

    #[test]
    fn wall_motion_reaches_both_ends() {
        let mut motion = WallMotion::new(200);
        let mut seen_one = false;
        for _ in 0..400 {
            motion.advance();
            if motion.fraction() == 1.0 {
                seen_one = true;
            }
        }
        assert!(seen_one);
        assert_eq!(motion.fraction(), 0.0);
    }

    #[test]
    fn network_cadence_fires_every_k_ticks() {
        let mut cadence = NetworkCadence::new(5);
        let fired: Vec<bool> = (0..10).map(|_| cadence.advance()).collect();
        assert_eq!(
            fired,
            vec![false, false, false, false, true, false, false, false, false, true]
        );
    }

    #[test]
    fn network_cadence_of_one_fires_every_tick() {
        let mut cadence = NetworkCadence::new(1);
        assert!((0..10).all(|_| cadence.advance()));
    }

    #[test]
    fn zero_periods_are_clamped() {
        let mut motion = WallMotion::new(0);
        motion.advance();
        assert!(motion.fraction().is_finite());
        assert!(NetworkCadence::new(0).advance());
    }

    proptest! {
        #[test]
        fn wall_motion_is_continuous_and_periodic(half_period in 1i32..500) {
            let mut motion = WallMotion::new(half_period);
            let step = 1.0 / half_period as f64;
            let start = motion;
            let mut previous = motion.fraction();
            for _ in 0..(2 * half_period) {
                motion.advance();
                let fraction = motion.fraction();
                prop_assert!((0.0..=1.0).contains(&fraction));
                prop_assert!((fraction - previous).abs() <= step + 1e-12);
                previous = fraction;
            }
            prop_assert_eq!(motion, start);
        }
    }
}
