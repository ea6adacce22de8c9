use glam::Vec2;

use br_core::viewport::ViewportSize;

pub type TargetId = u64;

/// Motion held back until the target's launch time.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingLaunch {
    at_ms: f64,
    velocity: Vec2,
    acceleration: Vec2,
}

/// One hittable object. Owned by the session's live-target list and dropped
/// when it is hit, culled, or the session ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub point_value: u32,
    pub hit_radius: f32,
    pending: Option<PendingLaunch>,
}

impl Target {
    pub fn new(
        id: TargetId,
        position: Vec2,
        velocity: Vec2,
        acceleration: Vec2,
        point_value: u32,
        hit_radius: f32,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            acceleration,
            point_value: point_value.max(1),
            hit_radius,
            pending: None,
        }
    }

    /// Parks the target at its spawn point until `launch_at_ms`. Its motion is
    /// kept aside and velocity/acceleration read zero until then.
    pub fn with_launch_at(mut self, launch_at_ms: f64) -> Self {
        self.pending = Some(PendingLaunch {
            at_ms: launch_at_ms,
            velocity: self.velocity,
            acceleration: self.acceleration,
        });
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self
    }

    pub fn is_pre_launch(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the held motion once `now_ms` reaches the launch time.
    /// Returns true on the call that launches.
    pub fn try_launch(&mut self, now_ms: f64) -> bool {
        match self.pending {
            Some(pending) if now_ms >= pending.at_ms => {
                self.velocity = pending.velocity;
                self.acceleration = pending.acceleration;
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Advances one step under constant acceleration. Position moves by the
    /// average of the old and new velocity, which is exact for constant
    /// acceleration, so one step of `a + b` equals a step of `a` then `b`.
    pub fn integrate(&mut self, dt_seconds: f32) {
        if self.pending.is_some() || dt_seconds <= 0.0 {
            return;
        }
        let previous = self.velocity;
        self.velocity += self.acceleration * dt_seconds;
        self.position += (previous + self.velocity) * 0.5 * dt_seconds;
    }

    pub fn is_out_of_bounds(&self, viewport_width: f32, viewport_height: f32, buffer: f32) -> bool {
        !ViewportSize::new(viewport_width, viewport_height)
            .contains_with_buffer(self.position, buffer)
    }

    /// Circular hit area, edge inclusive.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.position.distance_squared(point) <= self.hit_radius * self.hit_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn moving_target() -> Target {
        Target::new(
            1,
            Vec2::new(400.0, 300.0),
            Vec2::new(120.0, -80.0),
            Vec2::new(20.0, -13.0),
            3,
            25.0,
        )
    }

    #[test]
    fn integrate_applies_velocity_and_acceleration() {
        let mut target = Target::new(1, Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(2.0, 0.0), 1, 5.0);
        target.integrate(1.0);
        assert!((target.velocity.x - 12.0).abs() < EPS);
        assert!((target.position.x - 11.0).abs() < EPS);
    }

    #[test]
    fn one_long_step_equals_two_short_steps() {
        for (dt1, dt2) in [(0.016, 0.016), (0.05, 0.2), (0.0, 0.3), (0.25, 0.0001)] {
            let mut once = moving_target();
            let mut twice = moving_target();
            once.integrate(dt1 + dt2);
            twice.integrate(dt1);
            twice.integrate(dt2);
            assert!((once.position - twice.position).length() < EPS, "dt=({dt1},{dt2})");
            assert!((once.velocity - twice.velocity).length() < EPS, "dt=({dt1},{dt2})");
        }
    }

    #[test]
    fn pre_launch_target_holds_still_until_launch_time() {
        let mut target = moving_target().with_launch_at(1_000.0);
        assert!(target.is_pre_launch());
        assert_eq!(target.velocity, Vec2::ZERO);

        target.integrate(0.5);
        assert_eq!(target.position, Vec2::new(400.0, 300.0));

        assert!(!target.try_launch(999.0));
        assert!(target.try_launch(1_000.0));
        assert!(!target.try_launch(1_001.0));
        assert_eq!(target.velocity, Vec2::new(120.0, -80.0));
        assert_eq!(target.acceleration, Vec2::new(20.0, -13.0));

        target.integrate(0.1);
        assert!(target.position.x > 400.0);
    }

    #[test]
    fn out_of_bounds_respects_buffer() {
        let mut target = Target::new(1, Vec2::new(849.0, 300.0), Vec2::ZERO, Vec2::ZERO, 1, 10.0);
        assert!(!target.is_out_of_bounds(800.0, 600.0, 50.0));
        target.position.x = 851.0;
        assert!(target.is_out_of_bounds(800.0, 600.0, 50.0));
        target.position = Vec2::new(400.0, -51.0);
        assert!(target.is_out_of_bounds(800.0, 600.0, 50.0));
    }

    #[test]
    fn hit_area_is_circular_and_edge_inclusive() {
        let target = Target::new(1, Vec2::new(100.0, 100.0), Vec2::ZERO, Vec2::ZERO, 1, 10.0);
        assert!(target.contains_point(Vec2::new(110.0, 100.0)));
        assert!(target.contains_point(Vec2::new(106.0, 108.0)));
        assert!(!target.contains_point(Vec2::new(108.0, 108.0)));
    }

    #[test]
    fn point_value_is_at_least_one() {
        let target = Target::new(1, Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, 0, 10.0);
        assert_eq!(target.point_value, 1);
    }
}
