//! Tunable navigation and viewer settings
//!
//! Mirrors the parameter panel: every field here is user-adjustable at
//! runtime and persisted inside the project file.

use serde::{Deserialize, Serialize};

/// How a wheel event behaves after the user has taken camera control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollStyle {
    /// First wheel tick animates the camera back onto the path at the
    /// tracked scroll progress, ignoring further wheel input until the
    /// transition completes.
    TransitionOnEngage,
    /// Wheel input resumes scrubbing immediately, without a transition
    /// animation.
    DirectScrub,
}

/// Navigation engine and viewer tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavSettings {
    /// Progress units added per wheel delta unit while scrubbing
    pub scroll_speed: f32,
    /// Frame budget of the return-to-path transition animation
    pub animation_frames: u32,
    /// Free-fly translation speed, world units per frame at full input
    pub fly_speed: f32,
    /// Mouse-look divisor; larger values mean slower rotation
    pub rotation_sensitivity: f32,
    /// Dampens how far rotation slerp may swing between keyframes.
    /// 0 follows the slerp fully, 1 holds the segment-start orientation.
    pub swing_damping: f32,
    /// Curve samples generated per waypoint segment
    pub samples_per_segment: usize,
    /// Per-frame exponential approach factor of animated toward target progress
    pub scroll_smoothing: f32,
    /// Progress units advanced per frame in Auto mode
    pub auto_speed: f32,
    /// Wheel behavior after free flight
    pub scroll_style: ScrollStyle,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            scroll_speed: 0.05,
            animation_frames: 120,
            fly_speed: 0.2,
            rotation_sensitivity: 5000.0,
            swing_damping: 0.0,
            samples_per_segment: 20,
            scroll_smoothing: 0.1,
            auto_speed: 0.1,
            scroll_style: ScrollStyle::TransitionOnEngage,
        }
    }
}
