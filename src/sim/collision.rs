//! Collision detection and response
//!
//! Two kinds of contact: ball against ball (impulse with restitution plus
//! positional correction) and ball against the rotating arena wall (damped
//! bounce, or an escape when the ball is lined up with the gap).

use glam::Vec2;
use rand::Rng;

use super::gap::Gap;
use super::state::{Arena, Ball};
use crate::cartesian_to_polar;
use crate::consts::*;

/// What the wall did to a ball this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOutcome {
    /// Ball is clear of the wall
    Inside,
    /// Ball hit the wall and was reflected back inside
    Bounced,
    /// Ball crossed the wall through the gap
    Escaped,
}

/// Resolve a ball-ball contact with the default restitution
///
/// Returns true if the balls were overlapping and got separated.
pub fn resolve_ball_collision(a: &mut Ball, b: &mut Ball) -> bool {
    resolve_ball_collision_with(a, b, RESTITUTION)
}

pub(crate) fn resolve_ball_collision_with(a: &mut Ball, b: &mut Ball, restitution: f32) -> bool {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    let min_dist = a.radius() + b.radius();

    // Coincident centers have no usable normal
    if distance >= min_dist || distance <= 0.0 {
        return false;
    }

    // Normal points from a to b
    let normal = delta / distance;
    let vel_along_normal = (b.vel - a.vel).dot(normal);

    // Only approaching pairs exchange momentum
    if vel_along_normal < 0.0 {
        let inv_mass_sum = 1.0 / a.mass() + 1.0 / b.mass();
        let j = -(1.0 + restitution) * vel_along_normal / inv_mass_sum;
        let impulse = normal * j;
        a.vel -= impulse / a.mass();
        b.vel += impulse / b.mass();
    }

    // Split the overlap evenly
    let correction = normal * ((min_dist - distance) / 2.0);
    a.pos -= correction;
    b.pos += correction;

    true
}

/// Run the pairwise resolver over every unordered pair exactly once
///
/// O(n²); returns the number of contacts resolved.
pub fn resolve_all_pairs(balls: &mut [Ball]) -> usize {
    let mut contacts = 0;
    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if resolve_ball_collision(a, b) {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Resolve a ball against the arena wall at the given rotation
///
/// The wall is "reached" once the ball's edge touches the radius, but an
/// escape needs the center itself past the radius. A fast ball can cross
/// both thresholds inside the gap in a single step.
pub fn resolve_boundary(ball: &mut Ball, arena: &Arena, rotation: f32) -> BoundaryOutcome {
    let offset = ball.pos - arena.center;
    let (distance, angle) = cartesian_to_polar(offset);

    if distance < arena.radius - ball.radius() {
        return BoundaryOutcome::Inside;
    }
    // Ball sitting on the center has no radial direction
    if distance <= 0.0 {
        return BoundaryOutcome::Inside;
    }

    let gap = arena.gap();
    let in_gap = gap.contains(Gap::relative_angle(angle, rotation));

    if in_gap && distance >= arena.radius {
        ball.escaped = true;
        return BoundaryOutcome::Escaped;
    }

    let outward = offset / distance;
    ball.vel = -outward * (ball.speed() * WALL_DAMPING);

    let push_back = arena.radius - distance - ball.radius();
    ball.pos += outward * push_back;

    BoundaryOutcome::Bounced
}

/// Occasionally nudge a ball's velocity so the system never damps to rest
///
/// Returns true if a nudge was applied.
pub fn apply_jitter(ball: &mut Ball, rng: &mut impl Rng) -> bool {
    if !rng.random_bool(JITTER_CHANCE) {
        return false;
    }
    let nudge = Vec2::new(
        rng.random_range(-0.5f32..0.5) * JITTER_MAGNITUDE,
        rng.random_range(-0.5f32..0.5) * JITTER_MAGNITUDE,
    );
    ball.vel += nudge;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BallColor;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::FRAC_PI_2;

    fn ball(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::new(vx, vy), radius, BallColor::new(0.0))
    }

    fn arena() -> Arena {
        Arena::new(Vec2::new(200.0, 200.0), 150.0)
    }

    #[test]
    fn test_head_on_collision_reverses_approach() {
        let mut a = ball(0.0, 0.0, 1.0, 0.0, 6.0);
        let mut b = ball(10.0, 0.0, -1.0, 0.0, 6.0);

        assert!(resolve_ball_collision(&mut a, &mut b));
        // Equal masses, e = 0.8: each leaves at 0.8 of the approach speed
        assert!((a.vel.x - (-0.8)).abs() < 1e-5);
        assert!((b.vel.x - 0.8).abs() < 1e-5);
        assert!(a.pos.distance(b.pos) >= 12.0 - 1e-4);
    }

    #[test]
    fn test_heavier_ball_changes_less() {
        let mut light = ball(0.0, 0.0, 1.0, 0.0, 6.0);
        let mut heavy = ball(14.0, 0.0, 0.0, 0.0, 9.0);

        assert!(resolve_ball_collision(&mut light, &mut heavy));
        let light_dv = (light.vel - Vec2::new(1.0, 0.0)).length();
        let heavy_dv = heavy.vel.length();
        assert!(heavy_dv < light_dv);
    }

    #[test]
    fn test_separating_pair_gets_no_impulse() {
        let mut a = ball(0.0, 0.0, -1.0, 0.0, 6.0);
        let mut b = ball(10.0, 0.0, 1.0, 0.0, 6.0);

        assert!(resolve_ball_collision(&mut a, &mut b));
        assert_eq!(a.vel, Vec2::new(-1.0, 0.0));
        assert_eq!(b.vel, Vec2::new(1.0, 0.0));
        // Still pushed apart
        assert!(a.pos.distance(b.pos) >= 12.0 - 1e-4);
    }

    #[test]
    fn test_no_contact_when_apart() {
        let mut a = ball(0.0, 0.0, 1.0, 0.0, 6.0);
        let mut b = ball(12.5, 0.0, -1.0, 0.0, 6.0);
        assert!(!resolve_ball_collision(&mut a, &mut b));
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
        assert_eq!(b.pos, Vec2::new(12.5, 0.0));
    }

    #[test]
    fn test_coincident_centers_are_skipped() {
        let mut a = ball(5.0, 5.0, 1.0, 0.0, 6.0);
        let mut b = ball(5.0, 5.0, -1.0, 0.0, 7.0);

        assert!(!resolve_ball_collision(&mut a, &mut b));
        assert!(a.pos.is_finite() && a.vel.is_finite());
        assert!(b.pos.is_finite() && b.vel.is_finite());
    }

    #[test]
    fn test_all_pairs_visits_each_pair_once() {
        // Three mutually overlapping balls
        let mut balls = vec![
            ball(0.0, 0.0, 0.0, 0.0, 6.0),
            ball(8.0, 0.0, 0.0, 0.0, 6.0),
            ball(4.0, 6.0, 0.0, 0.0, 6.0),
        ];
        assert_eq!(resolve_all_pairs(&mut balls), 3);

        let mut single = vec![ball(0.0, 0.0, 1.0, 1.0, 6.0)];
        assert_eq!(resolve_all_pairs(&mut single), 0);
        assert_eq!(single[0].vel, Vec2::new(1.0, 1.0));
        assert_eq!(single[0].pos, Vec2::ZERO);
    }

    #[test]
    fn test_boundary_inside() {
        let mut b = ball(200.0, 200.0, 0.5, 0.0, 6.0);
        assert_eq!(resolve_boundary(&mut b, &arena(), 0.0), BoundaryOutcome::Inside);
        assert_eq!(b.vel, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_escape_through_gap() {
        // distance 150, relative angle 0
        let mut b = ball(350.0, 200.0, 0.5, 0.0, 6.0);
        assert_eq!(resolve_boundary(&mut b, &arena(), 0.0), BoundaryOutcome::Escaped);
        assert!(b.escaped);
        // No bounce applied
        assert_eq!(b.vel, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_edge_in_gap_but_center_inside_bounces() {
        // Edge past the wall, center short of it
        let mut b = ball(346.0, 200.0, 0.5, 0.0, 6.0);
        assert_eq!(resolve_boundary(&mut b, &arena(), 0.0), BoundaryOutcome::Bounced);
        assert!(!b.escaped);
        assert!(b.vel.x < 0.0);
    }

    #[test]
    fn test_bounce_outside_gap() {
        // distance 150 straight "up" in screen space, far from the gap
        let mut b = ball(200.0, 50.0, 0.0, -0.5, 6.0);
        assert_eq!(resolve_boundary(&mut b, &arena(), 0.0), BoundaryOutcome::Bounced);
        assert!(!b.escaped);

        let distance = b.pos.distance(arena().center);
        assert!(distance <= 150.0);
        assert!((distance - 144.0).abs() < 1e-3);

        // Radial component reversed, speed damped
        let outward = (Vec2::new(200.0, 50.0) - arena().center).normalize();
        assert!(b.vel.dot(outward) < 0.0);
        assert!((b.speed() - 0.5 * WALL_DAMPING).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_moves_the_gap() {
        let a = arena();
        // Top of the arena in world coordinates is angle -π/2
        let mut b = ball(200.0, 50.0, 0.0, -0.5, 6.0);
        assert_eq!(resolve_boundary(&mut b, &a, -FRAC_PI_2), BoundaryOutcome::Escaped);

        // The gap is no longer at angle 0
        let mut b = ball(350.0, 200.0, 0.5, 0.0, 6.0);
        assert_eq!(resolve_boundary(&mut b, &a, -FRAC_PI_2), BoundaryOutcome::Bounced);
    }

    #[test]
    fn test_gap_edges_escape_on_both_sides() {
        let a = arena();
        for angle in [GAP_HALF_WIDTH * 0.9, -GAP_HALF_WIDTH * 0.9] {
            let pos = a.center + crate::polar_to_cartesian(151.0, angle);
            let mut b = Ball::new(pos, Vec2::ZERO, 6.0, BallColor::new(0.0));
            assert_eq!(resolve_boundary(&mut b, &a, 0.0), BoundaryOutcome::Escaped);
        }
    }

    #[test]
    fn test_ball_at_arena_center_is_safe() {
        // Degenerate arena smaller than the ball, ball dead center
        let tiny = Arena::new(Vec2::new(200.0, 200.0), 3.0);
        let mut b = ball(200.0, 200.0, 0.0, 0.0, 6.0);
        assert_eq!(resolve_boundary(&mut b, &tiny, 0.0), BoundaryOutcome::Inside);
        assert!(b.pos.is_finite() && b.vel.is_finite());
    }

    #[test]
    fn test_jitter_is_rare_and_small() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut nudged = 0;
        for _ in 0..10_000 {
            let mut b = ball(0.0, 0.0, 0.0, 0.0, 6.0);
            if apply_jitter(&mut b, &mut rng) {
                nudged += 1;
                assert!(b.vel.x.abs() <= JITTER_MAGNITUDE / 2.0);
                assert!(b.vel.y.abs() <= JITTER_MAGNITUDE / 2.0);
            } else {
                assert_eq!(b.vel, Vec2::ZERO);
            }
        }
        // ~1% of 10k
        assert!((40..=200).contains(&nudged), "nudged {nudged} times");
    }

    fn overlapping_pair() -> impl Strategy<Value = (Ball, Ball)> {
        (
            6.0f32..9.0,
            6.0f32..9.0,
            0.0f32..std::f32::consts::TAU,
            0.05f32..1.0,
            (-1.0f32..1.0, -1.0f32..1.0),
            (-1.0f32..1.0, -1.0f32..1.0),
        )
            .prop_map(|(ra, rb, dir, frac, (vax, vay), (vbx, vby))| {
                let dist = (ra + rb) * frac * 0.99;
                let a = ball(100.0, 100.0, vax, vay, ra);
                let offset = crate::polar_to_cartesian(dist, dir);
                let b = ball(100.0 + offset.x, 100.0 + offset.y, vbx, vby, rb);
                (a, b)
            })
    }

    proptest! {
        #[test]
        fn prop_no_persistent_overlap((mut a, mut b) in overlapping_pair()) {
            resolve_ball_collision(&mut a, &mut b);
            let dist = a.pos.distance(b.pos);
            prop_assert!(dist >= a.radius() + b.radius() - 1e-3);
        }

        #[test]
        fn prop_energy_never_increases((mut a, mut b) in overlapping_pair()) {
            let before = a.kinetic_energy() + b.kinetic_energy();
            resolve_ball_collision(&mut a, &mut b);
            let after = a.kinetic_energy() + b.kinetic_energy();
            prop_assert!(after <= before + 1e-4);
        }

        #[test]
        fn prop_momentum_conserved_elastic((mut a, mut b) in overlapping_pair()) {
            let before = a.momentum() + b.momentum();
            resolve_ball_collision_with(&mut a, &mut b, 1.0);
            let after = a.momentum() + b.momentum();
            prop_assert!((after - before).length() < 1e-3);
        }
    }
}
