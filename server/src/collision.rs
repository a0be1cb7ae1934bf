//! Collision resolution for one ball against the rest of the world.
//!
//! Every function takes the candidate position for this tick (old position
//! plus velocity, possibly already corrected by an earlier pass) and returns
//! the corrected candidate. Velocity is updated in place. Passes run in the
//! order balls, walls, pegs and each resolves contacts one at a time; there
//! is no simultaneous-contact solve.

use minigolf_shared::level::{Segment, Wall};
use minigolf_shared::vec2::{Axis, Vec2};

use crate::ball::Ball;

/// Clearance added past the shift factor when a ball is pushed out.
const CLEARANCE: f64 = 1.0;

/// `n` strictly between `b1` and `b2` widened by `tolerance` on both sides.
fn is_between(n: f64, b1: f64, b2: f64, tolerance: f64) -> bool {
    let upper = b1.max(b2) + tolerance;
    let lower = b1.min(b2) - tolerance;
    n > lower && n < upper
}

/// Push the candidate out of every other ball it overlaps and trade a quarter
/// of the combined speed along the contact normal.
pub fn collide_with_balls<'a>(
    ball: &mut Ball,
    mut candidate: Vec2,
    others: impl IntoIterator<Item = &'a mut Ball>,
) -> Vec2 {
    for other in others {
        if other.id == ball.id {
            continue;
        }
        let diff = other.position - candidate;
        let radii = ball.radius + other.radius;
        if diff.length_squared() >= radii * radii {
            continue;
        }
        // A candidate on the other centre has no contact normal.
        let Some(normal) = diff.normalize() else {
            continue;
        };
        candidate = other.position - normal * (radii + CLEARANCE);
        let drag = normal * ((ball.velocity.length() + other.velocity.length()) / 4.0);
        ball.velocity -= drag;
        other.velocity += drag;
    }
    candidate
}

/// Resolve against every wall, moving walls taken at `wall_fraction`.
pub fn collide_with_walls(
    old: Vec2,
    mut candidate: Vec2,
    velocity: &mut Vec2,
    walls: &[Wall],
    wall_fraction: f64,
    shift_factor: f64,
    corner_margin: f64,
) -> Vec2 {
    for wall in walls {
        let segment = wall.segment_at(wall_fraction);
        if let Some(resolved) =
            collide_with_segment(old, candidate, velocity, &segment, shift_factor, corner_margin)
        {
            candidate = resolved;
        }
    }
    candidate
}

/// Resolve against one segment. `None` means no contact.
pub fn collide_with_segment(
    old: Vec2,
    candidate: Vec2,
    velocity: &mut Vec2,
    segment: &Segment,
    shift_factor: f64,
    corner_margin: f64,
) -> Option<Vec2> {
    if segment.is_degenerate() {
        return None;
    }
    match segment.perpendicular_axis() {
        Some(axis) => collide_axis_aligned(old, candidate, velocity, segment, axis, shift_factor),
        None => collide_diagonal(
            old,
            candidate,
            velocity,
            segment,
            shift_factor,
            corner_margin,
        ),
    }
}

/// Wall perpendicular to `axis`. The wall plane is shifted toward the side
/// the ball came from by `shift_factor`; a ball moving toward the wall whose
/// candidate reaches that plane bounces off it.
fn collide_axis_aligned(
    old: Vec2,
    candidate: Vec2,
    velocity: &mut Vec2,
    segment: &Segment,
    axis: Axis,
    shift_factor: f64,
) -> Option<Vec2> {
    let opp = axis.other();
    if !is_between(
        candidate.get(opp),
        segment.start.get(opp),
        segment.end.get(opp),
        shift_factor,
    ) {
        return None;
    }

    let wall = segment.start.get(axis);
    let offset = old.get(axis) - wall;
    if offset == 0.0 {
        return None;
    }
    let approach = offset.signum();
    let plane = wall + approach * shift_factor;

    let moving_toward = (candidate.get(axis) - old.get(axis)) * approach < 0.0;
    let reached_plane = (candidate.get(axis) - plane) * approach <= 0.0;
    if !(moving_toward && reached_plane) {
        return None;
    }

    velocity.set_axis(axis, -velocity.get(axis));
    let mut resolved = candidate;
    resolved.set_axis(axis, plane + approach * CLEARANCE);
    Some(resolved)
}

/// Angled wall. Side of wall is judged by which component of the
/// ball-to-wall-start vector dominates, after shifting the wall toward the
/// ball along its normal; levels place angled walls at 45°, where this test
/// and the component swap below are exact.
fn collide_diagonal(
    old: Vec2,
    candidate: Vec2,
    velocity: &mut Vec2,
    segment: &Segment,
    shift_factor: f64,
    corner_margin: f64,
) -> Option<Vec2> {
    let (start, end) = (segment.start, segment.end);
    let tolerance = shift_factor + corner_margin;
    if !is_between(candidate.x, start.x, end.x, tolerance)
        || !is_between(candidate.y, start.y, end.y, tolerance)
    {
        return None;
    }

    let old_rel = old - start;
    let new_rel = candidate - start;
    let along_wall = new_rel.vector_resolute(end - start)?;
    // Candidate exactly on the wall line gives no normal.
    let normal = (new_rel - along_wall).normalize()?;
    let shift = normal * shift_factor;

    if side_of_wall(old_rel - shift) == side_of_wall(new_rel - shift) {
        return None;
    }

    let (vx, vy) = (velocity.x, velocity.y);
    // Wall runs along y = x through its start when both deltas share a sign.
    if (start.x - end.x).signum() == (start.y - end.y).signum() {
        velocity.set(vy, vx);
    } else {
        velocity.set(-vy, -vx);
    }

    Some(start + along_wall + normal * (shift_factor + CLEARANCE))
}

fn side_of_wall(rel: Vec2) -> bool {
    rel.x.abs() < rel.y.abs()
}

/// First peg within `shift_factor` of the candidate wins: reflect the velocity
/// about the contact normal and put the ball just outside the peg.
pub fn collide_with_pegs(candidate: Vec2, velocity: &mut Vec2, pegs: &[Vec2], shift_factor: f64) -> Vec2 {
    for &peg in pegs {
        let offset = candidate - peg;
        if offset.length_squared() >= shift_factor * shift_factor {
            continue;
        }
        let Some(normal) = offset.normalize() else {
            continue;
        };
        let along = velocity.dot(normal);
        if along < 0.0 {
            *velocity -= normal * (2.0 * along);
        }
        return peg + normal * (shift_factor + CLEARANCE);
    }
    candidate
}
