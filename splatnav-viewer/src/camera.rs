//! Free-flight viewer camera
//!
//! Concrete [`EngineCamera`] used by the windowed viewer. The navigator
//! writes its pose while the camera is locked to the path; in free
//! flight the keyboard/mouse input drives it directly.

use nalgebra::{Matrix4, Perspective3, UnitQuaternion, Vector3};
use splatnav_core::{CameraPose, NavSettings};
use splatnav_nav::EngineCamera;

/// Per-frame flight input accumulated from window events.
#[derive(Debug, Clone, Default)]
pub struct FlightInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Mouse-look delta in pixels, accumulated while the drag button is held
    pub look_delta: (f32, f32),
}

impl FlightInput {
    /// True when any key or look input is pending this frame
    pub fn is_active(&self) -> bool {
        self.forward
            || self.backward
            || self.left
            || self.right
            || self.up
            || self.down
            || self.look_delta.0 != 0.0
            || self.look_delta.1 != 0.0
    }

    fn take_look_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }
}

/// Perspective fly camera with a pose the navigator can own.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub pose: CameraPose,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl FlyCamera {
    pub fn new(pose: CameraPose, aspect_ratio: f32) -> Self {
        Self {
            pose,
            fov: std::f32::consts::FRAC_PI_4,
            aspect_ratio,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// View matrix looking along the pose's forward direction
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let target = self.pose.position + self.pose.forward();
        Matrix4::look_at_rh(&self.pose.position, &target, &self.pose.up())
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far).into_inner()
    }

    /// Apply one frame of flight input; returns true when the camera
    /// actually moved, which is the viewer's cue to engage free-fly.
    pub fn apply_input(&mut self, input: &mut FlightInput, settings: &NavSettings) -> bool {
        let active = input.is_active();
        if !active {
            return false;
        }

        let mut translation = Vector3::zeros();
        if input.forward {
            translation += self.pose.forward();
        }
        if input.backward {
            translation -= self.pose.forward();
        }
        if input.right {
            translation += self.pose.right();
        }
        if input.left {
            translation -= self.pose.right();
        }
        if input.up {
            translation += Vector3::y();
        }
        if input.down {
            translation -= Vector3::y();
        }
        if translation.norm_squared() > 0.0 {
            self.pose.position += translation.normalize() * settings.fly_speed;
        }

        let (dx, dy) = input.take_look_delta();
        if dx != 0.0 || dy != 0.0 {
            let sensitivity = settings.rotation_sensitivity.max(1.0);
            // Yaw around world up, pitch around the camera's own right
            // axis, so the horizon stays level.
            let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -dx / sensitivity);
            let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -dy / sensitivity);
            self.pose.rotation = yaw * self.pose.rotation * pitch;
        }
        true
    }
}

impl EngineCamera for FlyCamera {
    fn pose(&self) -> CameraPose {
        self.pose
    }

    fn set_pose(&mut self, pose: &CameraPose) {
        self.pose = *pose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn forward_input_moves_along_view_direction() {
        let mut camera = FlyCamera::new(CameraPose::identity(), 1.0);
        let mut input = FlightInput {
            forward: true,
            ..FlightInput::default()
        };
        let settings = NavSettings::default();

        assert!(camera.apply_input(&mut input, &settings));
        // Identity orientation looks down -Z
        assert_relative_eq!(
            camera.pose.position,
            Point3::new(0.0, 0.0, -settings.fly_speed),
            epsilon = 1e-6
        );
    }

    #[test]
    fn look_delta_is_consumed_once() {
        let mut camera = FlyCamera::new(CameraPose::identity(), 1.0);
        let mut input = FlightInput {
            look_delta: (200.0, 0.0),
            ..FlightInput::default()
        };
        let settings = NavSettings::default();

        camera.apply_input(&mut input, &settings);
        let rotated = camera.pose.rotation;
        assert!(rotated.angle() > 0.0);

        // Delta was taken; a second frame without new input is a no-op
        assert!(!camera.apply_input(&mut input, &settings));
        assert_eq!(camera.pose.rotation, rotated);
    }

    #[test]
    fn idle_input_does_not_move_the_camera() {
        let mut camera = FlyCamera::new(CameraPose::identity(), 1.0);
        let mut input = FlightInput::default();
        assert!(!camera.apply_input(&mut input, &NavSettings::default()));
        assert_eq!(camera.pose, CameraPose::identity());
    }
}
