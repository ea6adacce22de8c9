//! Spawn policy: where a new target appears, how it moves, what it is worth.
//!
//! The policy rewards reaction speed. A speed is drawn uniformly from the
//! configured range and the point value is derived from it, so faster targets
//! are worth more. The hit radius shrinks linearly as points grow, from
//! `max_radius` at one point down to `min_radius` at the maximum. Every target
//! flies straight away from the viewport centre and keeps accelerating in the
//! same direction.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use br_core::viewport::ViewportSize;

use crate::config::SpawnConfig;
use crate::target::{Target, TargetId};

/// Upper bound on the point value of a single target.
pub const MAX_TARGET_POINTS: u32 = 1_000;

pub struct SpawnPolicy {
    config: SpawnConfig,
    rng: StdRng,
}

impl SpawnPolicy {
    pub fn new(config: SpawnConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    pub fn points_for_speed(&self, speed: f32) -> u32 {
        ((speed / self.config.speed_per_point).floor() as u32).clamp(1, MAX_TARGET_POINTS)
    }

    pub fn max_points(&self) -> u32 {
        self.points_for_speed(self.config.max_speed)
    }

    pub fn radius_for_points(&self, points: u32) -> f32 {
        let max_points = self.max_points();
        let span = self.config.max_radius - self.config.min_radius;
        let step = span / max_points.saturating_sub(1).max(1) as f32;
        (self.config.max_radius - points.saturating_sub(1) as f32 * step).max(self.config.min_radius)
    }

    /// Builds a target somewhere inside the visible area. The vertical range
    /// leaves room for the HUD at the top and the bottom edge.
    pub fn spawn(&mut self, id: TargetId, viewport: ViewportSize) -> Target {
        let x = self.rng.gen::<f32>() * viewport.width;
        let usable_height =
            (viewport.height - self.config.margin_top - self.config.margin_bottom).max(0.0);
        let y = self.config.margin_top + self.rng.gen::<f32>() * usable_height;
        let position = Vec2::new(x, y);

        let direction = self.outward_direction(position, viewport.center());
        let speed = if self.config.max_speed > self.config.min_speed {
            self.rng.gen_range(self.config.min_speed..self.config.max_speed)
        } else {
            self.config.min_speed
        };
        let points = self.points_for_speed(speed);
        let radius = self.radius_for_points(points);

        log::trace!(
            "Spawn #{id}: pos=({:.0},{:.0}) speed={speed:.0} points={points} radius={radius:.1}",
            position.x,
            position.y
        );

        Target::new(
            id,
            position,
            direction * speed,
            direction * self.config.acceleration,
            points,
            radius,
        )
    }

    /// Unit vector from `center` towards `position`. Too close to the centre
    /// to have a meaningful direction, a uniformly random angle is used.
    pub fn outward_direction(&mut self, position: Vec2, center: Vec2) -> Vec2 {
        let offset = position - center;
        if offset.length() < self.config.center_epsilon.max(f32::EPSILON) {
            let angle = self.rng.gen::<f32>() * TAU;
            return Vec2::new(angle.cos(), angle.sin());
        }
        offset.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SpawnPolicy {
        SpawnPolicy::new(SpawnConfig {
            rng_seed: Some(seed),
            ..SpawnConfig::default()
        })
    }

    #[test]
    fn default_table_maps_speed_to_points() {
        let policy = seeded(1);
        assert_eq!(policy.points_for_speed(100.0), 2);
        assert_eq!(policy.points_for_speed(149.9), 2);
        assert_eq!(policy.points_for_speed(250.0), 5);
        assert_eq!(policy.points_for_speed(10.0), 1);
        assert_eq!(policy.max_points(), 6);
    }

    #[test]
    fn radius_shrinks_as_points_grow() {
        let policy = seeded(1);
        assert!((policy.radius_for_points(1) - 40.0).abs() < 1e-4);
        assert!((policy.radius_for_points(2) - 35.0).abs() < 1e-4);
        assert!((policy.radius_for_points(6) - 15.0).abs() < 1e-4);
        assert!((policy.radius_for_points(50) - 15.0).abs() < 1e-4);
        let mut last = f32::MAX;
        for points in 1..=6 {
            let r = policy.radius_for_points(points);
            assert!(r < last);
            last = r;
        }
    }

    #[test]
    fn spawned_targets_stay_in_spawn_band_and_move_outward() {
        let mut policy = seeded(42);
        let viewport = ViewportSize::new(800.0, 600.0);
        for id in 0..200 {
            let target = policy.spawn(id, viewport);
            assert!(target.position.x >= 0.0 && target.position.x <= 800.0);
            assert!(target.position.y >= 20.0 && target.position.y <= 540.0);

            let speed = target.velocity.length();
            assert!((99.9..=300.1).contains(&speed), "speed {speed}");
            assert!((2..=6).contains(&target.point_value));
            assert!((target.hit_radius - policy.radius_for_points(target.point_value)).abs() < 1e-4);
            assert!((target.acceleration.length() - 20.0).abs() < 1e-3);

            let outward = target.position - viewport.center();
            if outward.length() >= 10.0 {
                assert!(outward.dot(target.velocity) > 0.0);
            }
        }
    }

    #[test]
    fn direction_at_centre_falls_back_to_random_unit_vector() {
        let mut policy = seeded(3);
        let center = Vec2::new(400.0, 300.0);
        let dir = policy.outward_direction(center, center);
        assert!((dir.length() - 1.0).abs() < 1e-4);
        assert!(dir.is_finite());

        let near = policy.outward_direction(center + Vec2::new(3.0, 4.0), center);
        assert!((near.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn same_seed_same_targets() {
        let viewport = ViewportSize::new(1024.0, 768.0);
        let mut a = seeded(9);
        let mut b = seeded(9);
        for id in 0..10 {
            assert_eq!(a.spawn(id, viewport), b.spawn(id, viewport));
        }
    }

    #[test]
    fn degenerate_viewport_does_not_panic() {
        let mut policy = seeded(5);
        let target = policy.spawn(0, ViewportSize::new(0.0, 10.0));
        assert!(target.position.is_finite());
        assert!(target.velocity.is_finite());
    }

    #[test]
    fn fixed_speed_range_is_allowed() {
        let mut policy = SpawnPolicy::new(SpawnConfig {
            min_speed: 150.0,
            max_speed: 150.0,
            rng_seed: Some(1),
            ..SpawnConfig::default()
        });
        let target = policy.spawn(0, ViewportSize::new(800.0, 600.0));
        assert!((target.velocity.length() - 150.0).abs() < 1e-3);
        assert_eq!(target.point_value, 3);
    }

    #[test]
    fn point_value_is_capped_for_extreme_speeds() {
        let policy = SpawnPolicy::new(SpawnConfig {
            min_speed: 9.0e9,
            max_speed: 1.0e10,
            speed_per_point: 1.0,
            rng_seed: Some(3),
            ..SpawnConfig::default()
        });
        assert_eq!(policy.points_for_speed(1.0e10), MAX_TARGET_POINTS);
        assert_eq!(policy.max_points(), MAX_TARGET_POINTS);
    }
}
