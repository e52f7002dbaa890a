//! Narrow capability interface to the live rendering camera
//!
//! The navigation core never touches the renderer's concrete camera
//! type; everything it needs is a pose read and a pose write. This keeps
//! the engine unit-testable against [`FakeCamera`].

use splatnav_core::CameraPose;

/// The live camera as seen by the navigation engine.
pub trait EngineCamera {
    /// Current world pose
    fn pose(&self) -> CameraPose;

    /// Write the authoritative pose for this frame. Called at most once
    /// per frame by the navigator.
    fn set_pose(&mut self, pose: &CameraPose);
}

/// In-memory camera for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct FakeCamera {
    pub current: CameraPose,
    /// Number of pose writes, for asserting the once-per-frame contract
    pub writes: usize,
}

impl FakeCamera {
    pub fn new(pose: CameraPose) -> Self {
        Self {
            current: pose,
            writes: 0,
        }
    }
}

impl EngineCamera for FakeCamera {
    fn pose(&self) -> CameraPose {
        self.current
    }

    fn set_pose(&mut self, pose: &CameraPose) {
        self.current = *pose;
        self.writes += 1;
    }
}
