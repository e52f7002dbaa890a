//! Camera path navigation engine for splatnav
//!
//! Turns a sparse, user-edited waypoint list into a continuous,
//! scrub-able camera path and reconciles scripted traversal, free user
//! flight and transition animation into one authoritative camera pose
//! per frame:
//! - Sampled Catmull-Rom position curve with slerp rotation keyframes
//! - Target/animated scroll progress pair
//! - Mode state machine (Tour / Explore / Auto x Locked / Flying / Transitioning)
//! - Frame-budgeted, cancellable pose transitions
//! - Edit-mode bridge for capturing waypoints from the live camera

pub mod path;
pub mod progress;
pub mod animator;
pub mod modes;
pub mod camera;
pub mod navigator;

pub use path::*;
pub use progress::*;
pub use animator::*;
pub use modes::*;
pub use camera::*;
pub use navigator::*;
