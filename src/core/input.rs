use glam::Vec2;
use minifb::{Key, KeyRepeat, MouseMode, Window};

use super::Camera;

/// Everything the simulation needs from the input devices for one frame.
///
/// Polled once per frame so camera updates can be driven without a window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Cursor movement since last frame, in pixels
    pub mouse_delta: Vec2,
    pub quit: bool,
    pub toggle_outline: bool,
    pub screenshot: bool,
    pub dump_camera: bool,
}

impl InputState {
    pub fn poll(window: &Window, mouse: &mut MouseTracker) -> Self {
        Self {
            forward: window.is_key_down(Key::W),
            backward: window.is_key_down(Key::S),
            left: window.is_key_down(Key::A),
            right: window.is_key_down(Key::D),
            up: window.is_key_down(Key::Space),
            down: window.is_key_down(Key::LeftShift),
            mouse_delta: mouse.track(window.get_mouse_pos(MouseMode::Pass)),
            quit: !window.is_open() || window.is_key_down(Key::Escape),
            toggle_outline: window.is_key_pressed(Key::E, KeyRepeat::No),
            screenshot: window.is_key_pressed(Key::F12, KeyRepeat::No),
            dump_camera: window.is_key_pressed(Key::Slash, KeyRepeat::No),
        }
    }
}

/// Turns absolute cursor positions into per frame deltas.
///
/// minifb can't grab the pointer, so relative motion is recovered from
/// successive positions. The first sample and any frame where the cursor
/// left the window produce no motion.
#[derive(Debug, Default)]
pub struct MouseTracker {
    last: Option<Vec2>,
}

impl MouseTracker {
    pub fn track(&mut self, pos: Option<(f32, f32)>) -> Vec2 {
        let pos = pos.map(Vec2::from);
        let delta = match (self.last, pos) {
            (Some(last), Some(now)) => now - last,
            _ => Vec2::ZERO,
        };
        self.last = pos;
        delta
    }
}

/// Applies an [`InputState`] to a camera.
#[derive(Debug, Clone, Copy)]
pub struct CameraController {
    /// World units per second
    pub move_speed: f32,
    /// Degrees per pixel of mouse travel
    pub mouse_sensitivity: f32,
}

impl CameraController {
    pub fn new(move_speed: f32, mouse_sensitivity: f32) -> Self {
        Self {
            move_speed,
            mouse_sensitivity,
        }
    }

    /// Advance `camera` by one frame lasting `delta_ms` milliseconds.
    pub fn update(&self, camera: &mut Camera, input: &InputState, delta_ms: f32) {
        let look = input.mouse_delta * self.mouse_sensitivity;
        camera.rotate(look.x, look.y);

        let speed = self.move_speed * delta_ms / 1000.0;

        if input.forward {
            camera.move_forward(speed);
        }
        if input.backward {
            camera.move_forward(-speed);
        }
        if input.right {
            camera.move_right(speed);
        }
        if input.left {
            camera.move_right(-speed);
        }
        if input.up {
            camera.move_up(speed);
        }
        if input.down {
            camera.move_up(-speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::camera::MAX_PITCH;
    use glam::Vec3;

    const EPS: f32 = 1e-4;

    fn controller() -> CameraController {
        CameraController::new(5.0, 0.25)
    }

    #[test]
    fn speed_scales_with_elapsed_time() {
        let input = InputState {
            forward: true,
            ..Default::default()
        };
        let mut cam = Camera::default();
        controller().update(&mut cam, &input, 1000.0);
        assert!((cam.position - Vec3::new(0.0, 0.0, 5.0)).length() < EPS);

        let mut cam = Camera::default();
        for _ in 0..4 {
            controller().update(&mut cam, &input, 250.0);
        }
        assert!((cam.position - Vec3::new(0.0, 0.0, 5.0)).length() < EPS);
    }

    #[test]
    fn movement_follows_yaw_only() {
        let input = InputState {
            forward: true,
            ..Default::default()
        };
        let mut cam = Camera::new(Vec3::ZERO, 90.0, 80.0, 0.0);
        controller().update(&mut cam, &input, 200.0);
        assert!((cam.position - Vec3::new(1.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn strafing_is_perpendicular() {
        let mut cam = Camera::default();
        let right = InputState {
            right: true,
            ..Default::default()
        };
        controller().update(&mut cam, &right, 1000.0);
        assert!((cam.position - Vec3::new(5.0, 0.0, 0.0)).length() < EPS);

        let left = InputState {
            left: true,
            ..Default::default()
        };
        controller().update(&mut cam, &left, 2000.0);
        assert!((cam.position - Vec3::new(-5.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn opposite_keys_cancel() {
        let input = InputState {
            forward: true,
            backward: true,
            left: true,
            right: true,
            up: true,
            down: true,
            ..Default::default()
        };
        let mut cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), 12.0, 0.0, 0.0);
        controller().update(&mut cam, &input, 16.0);
        assert!((cam.position - Vec3::new(1.0, 2.0, 3.0)).length() < EPS);
    }

    #[test]
    fn up_key_decreases_y() {
        let mut cam = Camera::default();
        let up = InputState {
            up: true,
            ..Default::default()
        };
        controller().update(&mut cam, &up, 1000.0);
        assert_eq!(cam.position.y, -5.0);

        let down = InputState {
            down: true,
            ..Default::default()
        };
        controller().update(&mut cam, &down, 500.0);
        assert_eq!(cam.position.y, -2.5);
    }

    #[test]
    fn mouse_updates_angles_and_clamps_pitch() {
        let mut cam = Camera::default();
        let input = InputState {
            mouse_delta: Vec2::new(40.0, -20.0),
            ..Default::default()
        };
        controller().update(&mut cam, &input, 0.0);
        assert_eq!(cam.yaw, 10.0);
        assert_eq!(cam.pitch, -5.0);

        let big = InputState {
            mouse_delta: Vec2::new(0.0, 10_000.0),
            ..Default::default()
        };
        for _ in 0..3 {
            controller().update(&mut cam, &big, 16.0);
            assert_eq!(cam.pitch, MAX_PITCH);
        }
    }

    #[test]
    fn tracker_reports_relative_motion() {
        let mut tracker = MouseTracker::default();
        assert_eq!(tracker.track(Some((10.0, 10.0))), Vec2::ZERO);
        assert_eq!(tracker.track(Some((14.0, 7.0))), Vec2::new(4.0, -3.0));
        assert_eq!(tracker.track(None), Vec2::ZERO);
        assert_eq!(tracker.track(Some((0.0, 0.0))), Vec2::ZERO);
        assert_eq!(tracker.track(Some((1.0, 2.0))), Vec2::new(1.0, 2.0));
    }
}
