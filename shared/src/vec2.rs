//! 2D vector used for positions, velocities and geometric offsets.
//!
//! Methods taking `self` return new values. Methods ending in `_in_place`
//! alter the receiver and are only meant for vectors the caller owns
//! (a ball's own velocity), never for shared level geometry.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Shorthand constructor
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// One coordinate axis, for code that treats x and y symmetrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scale(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalize(self) -> Option<Vec2> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Vec2::new(self.x / len, self.y / len))
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Projection of `self` onto `onto`: `onto * (self·onto / onto·onto)`.
    /// `None` when `onto` has zero length.
    pub fn vector_resolute(self, onto: Vec2) -> Option<Vec2> {
        let denom = onto.dot(onto);
        if denom == 0.0 {
            return None;
        }
        Some(onto.scale(self.dot(onto) / denom))
    }

    /// Rotate by `n` quarter turns, clockwise on screen (y grows downward):
    /// up → right → down → left. Exact, no trigonometry.
    pub fn rotate_quarter_turns(self, n: u8) -> Vec2 {
        match n % 4 {
            0 => self,
            1 => Vec2::new(-self.y, self.x),
            2 => Vec2::new(-self.x, -self.y),
            _ => Vec2::new(self.y, -self.x),
        }
    }

    /// Round each axis to the nearest multiple of `grid`.
    pub fn snap_to_grid(self, grid: f64) -> Vec2 {
        if grid <= 0.0 {
            return self;
        }
        Vec2::new(
            grid * (self.x / grid).round(),
            grid * (self.y / grid).round(),
        )
    }

    /// Linear interpolation, `t = 0` gives `self` exactly.
    pub fn lerp(self, to: Vec2, t: f64) -> Vec2 {
        if t == 0.0 {
            return self;
        }
        Vec2::new(
            self.x + (to.x - self.x) * t,
            self.y + (to.y - self.y) * t,
        )
    }

    pub fn get(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    // === In-place variants ===

    pub fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn set_axis(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    pub fn scale_in_place(&mut self, s: f64) {
        self.x *= s;
        self.y *= s;
    }

    /// Normalize the receiver. Returns false and leaves it untouched when
    /// its length is zero.
    pub fn normalize_in_place(&mut self) -> bool {
        match self.normalize() {
            Some(unit) => {
                *self = unit;
                true
            }
            None => false,
        }
    }

    pub fn rotate_quarter_turns_in_place(&mut self, n: u8) {
        *self = self.rotate_quarter_turns(n);
    }

    pub fn snap_to_grid_in_place(&mut self, grid: f64) {
        *self = self.snap_to_grid(grid);
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(a: [f64; 2]) -> Self {
        Vec2::new(a[0], a[1])
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
            "Expected {:?} to be close to {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn arithmetic_returns_new_values() {
        let a = vec2(1.0, 2.0);
        let b = vec2(3.0, -4.0);
        assert_eq!(a + b, vec2(4.0, -2.0));
        assert_eq!(a - b, vec2(-2.0, 6.0));
        assert_eq!(a * 3.0, vec2(3.0, 6.0));
        assert_eq!(-a, vec2(-1.0, -2.0));
        // operands untouched
        assert_eq!(a, vec2(1.0, 2.0));
        assert_eq!(b, vec2(3.0, -4.0));
    }

    #[test]
    fn in_place_ops_mutate_receiver() {
        let mut v = vec2(3.0, 4.0);
        v += vec2(1.0, 1.0);
        assert_eq!(v, vec2(4.0, 5.0));
        v -= vec2(4.0, 1.0);
        assert_eq!(v, vec2(0.0, 4.0));
        v.scale_in_place(0.5);
        assert_eq!(v, vec2(0.0, 2.0));
        assert!(v.normalize_in_place());
        assert_eq!(v, vec2(0.0, 1.0));
        v.rotate_quarter_turns_in_place(1);
        assert_eq!(v, vec2(-1.0, 0.0));
        v.set(12.4, 30.0);
        v.snap_to_grid_in_place(25.0);
        assert_eq!(v, vec2(0.0, 25.0));
    }

    #[test]
    fn length_of_3_4_is_5() {
        let v = vec2(3.0, 4.0);
        assert_eq!(v.length_squared(), 25.0);
        assert_eq!(v.length(), 5.0);
    }

    #[test]
    fn normalize_zero_is_none() {
        assert_eq!(Vec2::ZERO.normalize(), None);
        let mut z = Vec2::ZERO;
        assert!(!z.normalize_in_place());
        assert_eq!(z, Vec2::ZERO);
    }

    #[test]
    fn normalize_gives_unit_length() {
        let n = vec2(-7.0, 24.0).normalize().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert_vec2_close(n, vec2(-7.0 / 25.0, 24.0 / 25.0));
    }

    #[test]
    fn vector_resolute_projects_onto_direction() {
        let p = vec2(3.0, 5.0).vector_resolute(vec2(2.0, 0.0)).unwrap();
        assert_eq!(p, vec2(3.0, 0.0));

        let diag = vec2(60.0, 20.0).vector_resolute(vec2(100.0, 100.0)).unwrap();
        assert_vec2_close(diag, vec2(40.0, 40.0));

        assert_eq!(vec2(1.0, 1.0).vector_resolute(Vec2::ZERO), None);
    }

    #[test]
    fn quarter_turns_go_up_right_down_left() {
        let up = vec2(0.0, -1.0);
        assert_eq!(up.rotate_quarter_turns(0), up);
        assert_eq!(up.rotate_quarter_turns(1), vec2(1.0, 0.0));
        assert_eq!(up.rotate_quarter_turns(2), vec2(0.0, 1.0));
        assert_eq!(up.rotate_quarter_turns(3), vec2(-1.0, 0.0));
        assert_eq!(up.rotate_quarter_turns(4), up);
        assert_eq!(up.rotate_quarter_turns(7), up.rotate_quarter_turns(3));
    }

    #[test]
    fn quarter_turns_are_exact() {
        let v = vec2(0.1, -0.08);
        let mut r = v;
        for _ in 0..4 {
            r = r.rotate_quarter_turns(1);
        }
        assert_eq!(r, v);
    }

    #[test]
    fn snap_rounds_to_nearest_multiple() {
        assert_eq!(vec2(12.0, 13.0).snap_to_grid(25.0), vec2(0.0, 25.0));
        assert_eq!(vec2(-38.0, 62.4).snap_to_grid(25.0), vec2(-50.0, 50.0));
        assert_eq!(vec2(3.0, 4.0).snap_to_grid(0.0), vec2(3.0, 4.0));
    }

    #[test]
    fn lerp_endpoints() {
        let a = vec2(0.1, 0.7);
        let b = vec2(10.0, -3.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_vec2_close(a.lerp(b, 1.0), b);
        assert_vec2_close(a.lerp(b, 0.5), vec2(5.05, -1.15));
    }

    #[test]
    fn dot_and_equality() {
        assert_eq!(vec2(1.0, 0.0).dot(vec2(0.0, 1.0)), 0.0);
        assert_eq!(vec2(2.0, 3.0).dot(vec2(4.0, -1.0)), 5.0);
        assert_eq!(vec2(1.5, 2.5), Vec2::from([1.5, 2.5]));
        assert_ne!(vec2(1.5, 2.5), vec2(2.5, 1.5));
    }
}
