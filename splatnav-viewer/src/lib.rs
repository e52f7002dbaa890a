//! Interactive windowed viewer for splatnav
//!
//! Hosts the navigation engine in a wgpu/winit window: a point-cloud
//! scene with the authored path drawn as an overlay, free-flight camera
//! controls and egui panels for waypoint editing, settings and project
//! load/save.

pub mod app;
pub mod camera;
pub mod panels;
pub mod renderer;
pub mod shaders;

pub use app::*;
pub use camera::*;
pub use panels::*;
pub use renderer::*;
