//! Core data structures for splatnav
//!
//! This crate provides the fundamental types shared by the navigation
//! engine and the viewer: camera poses, waypoints with attached
//! interactions, viewer settings and the common error type.

pub mod pose;
pub mod waypoint;
pub mod settings;
pub mod error;

pub use pose::*;
pub use waypoint::*;
pub use settings::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Quaternion, UnitQuaternion};

/// Common result type for splatnav operations
pub type Result<T> = std::result::Result<T, Error>;
