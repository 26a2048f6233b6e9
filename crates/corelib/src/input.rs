//! Input → camera glue: cursor deltas and held movement keys.

use crate::{CoreResult, camera::Direction, camera::FlyCamera};

/// Turns absolute cursor positions into per-event deltas.
/// The first sample after creation (or [`MouseTracker::reset`]) only primes
/// the tracker.
#[derive(Clone, Copy, Debug, Default)]
pub struct MouseTracker {
    last: Option<(f64, f64)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(dx, dy)` with `dy` positive when the cursor moves up
    /// (screen y grows downwards).
    pub fn delta(&mut self, x: f64, y: f64) -> (f32, f32) {
        let delta = match self.last {
            Some((last_x, last_y)) => ((x - last_x) as f32, (last_y - y) as f32),
            None => (0.0, 0.0),
        };
        self.last = Some((x, y));
        delta
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Which movement keys are currently held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementKeys {
    pub fn set(&mut self, direction: Direction, pressed: bool) {
        *self.slot(direction) = pressed;
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.forward,
            Direction::Backward => self.backward,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.is_held(*d))
    }

    fn slot(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// Per-frame driver for a [`FlyCamera`].
#[derive(Clone, Copy, Debug)]
pub struct CameraController {
    /// World units per second.
    pub speed: f32,
    pub constrain_pitch: bool,
    keys: MovementKeys,
    mouse: MouseTracker,
}

impl CameraController {
    pub const DEFAULT_SPEED: f32 = 10.0;

    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            constrain_pitch: true,
            keys: MovementKeys::default(),
            mouse: MouseTracker::new(),
        }
    }

    pub fn set_key(&mut self, direction: Direction, pressed: bool) {
        self.keys.set(direction, pressed);
    }

    pub fn keys(&self) -> MovementKeys {
        self.keys
    }

    /// Feed an absolute cursor position.
    pub fn cursor_moved(&mut self, camera: &mut FlyCamera, x: f64, y: f64) -> CoreResult<()> {
        let (dx, dy) = self.mouse.delta(x, y);
        if dx == 0.0 && dy == 0.0 {
            return Ok(());
        }
        camera.look(dx, dy, self.constrain_pitch)
    }

    /// Apply every held key once, each by `speed * dt`.
    pub fn update(&mut self, camera: &mut FlyCamera, dt: f32) {
        let distance = self.speed * dt;
        for direction in self.keys.held() {
            camera.move_in(direction, distance);
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn first_cursor_sample_only_primes() {
        let mut mouse = MouseTracker::new();
        assert_eq!(mouse.delta(400.0, 300.0), (0.0, 0.0));
        assert_eq!(mouse.delta(410.0, 290.0), (10.0, 10.0));
        mouse.reset();
        assert_eq!(mouse.delta(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn held_keys_move_by_speed_times_dt() {
        let mut camera = FlyCamera::default();
        let mut controller = CameraController::default();
        controller.set_key(Direction::Forward, true);
        controller.set_key(Direction::Right, true);

        controller.update(&mut camera, 0.5);
        assert!(camera.position().abs_diff_eq(vec3(5.0, 4.0, 25.0), 1e-4));

        controller.set_key(Direction::Right, false);
        assert_eq!(controller.keys().held().collect::<Vec<_>>(), vec![Direction::Forward]);
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let mut camera = FlyCamera::default();
        let start = camera.position();
        let mut controller = CameraController::default();
        for d in Direction::ALL {
            controller.set_key(d, true);
        }
        controller.update(&mut camera, 0.016);
        assert!(camera.position().abs_diff_eq(start, 1e-4));
    }

    #[test]
    fn cursor_motion_turns_the_camera() {
        let mut camera = FlyCamera::default();
        let mut controller = CameraController::default();
        controller.cursor_moved(&mut camera, 100.0, 100.0).unwrap();
        assert_eq!(camera.yaw(), -90.0);

        // right and up by 50px at 0.1°/px
        controller.cursor_moved(&mut camera, 150.0, 50.0).unwrap();
        assert!((camera.yaw() - -85.0).abs() < 1e-4);
        assert!((camera.pitch() - 5.0).abs() < 1e-4);
    }
}
