//! Camera pose representation and axis-wise editing

use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A camera pose: world position plus orientation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

/// One axis of a position or Euler-angle edit.
///
/// Field edits coming from the UI always name an explicit axis; there is
/// no string parsing of field names anywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Display label for UI panels
    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl CameraPose {
    /// Create a pose from a position and orientation
    pub fn new(position: Point3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self { position, rotation }
    }

    /// Pose at the world origin with identity orientation
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pose at a position with identity orientation
    pub fn from_position(position: Point3<f32>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Get one position component
    pub fn position_component(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.position.x,
            Axis::Y => self.position.y,
            Axis::Z => self.position.z,
        }
    }

    /// Set one position component
    pub fn set_position_component(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.position.x = value,
            Axis::Y => self.position.y = value,
            Axis::Z => self.position.z = value,
        }
    }

    /// Get one Euler-angle component (radians) of the orientation.
    ///
    /// Uses nalgebra's intrinsic roll/pitch/yaw decomposition; `Axis::X`
    /// maps to roll, `Axis::Y` to pitch, `Axis::Z` to yaw.
    pub fn euler_component(&self, axis: Axis) -> f32 {
        let (roll, pitch, yaw) = self.rotation.euler_angles();
        match axis {
            Axis::X => roll,
            Axis::Y => pitch,
            Axis::Z => yaw,
        }
    }

    /// Replace one Euler-angle component (radians), keeping the others.
    ///
    /// The stored quaternion is decomposed, the named component replaced
    /// and the orientation recomposed.
    pub fn set_euler_component(&mut self, axis: Axis, value: f32) {
        let (mut roll, mut pitch, mut yaw) = self.rotation.euler_angles();
        match axis {
            Axis::X => roll = value,
            Axis::Y => pitch = value,
            Axis::Z => yaw = value,
        }
        self.rotation = UnitQuaternion::from_euler_angles(roll, pitch, yaw);
    }

    /// Forward direction of this pose (-Z in camera space)
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * -Vector3::z()
    }

    /// Up direction of this pose
    pub fn up(&self) -> Vector3<f32> {
        self.rotation * Vector3::y()
    }

    /// Right direction of this pose
    pub fn right(&self) -> Vector3<f32> {
        self.rotation * Vector3::x()
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::identity()
    }
}
