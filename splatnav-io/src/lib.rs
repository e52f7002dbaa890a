//! Project file persistence for splatnav
//!
//! Saves and loads the authored state of a viewer session: the waypoint
//! list with interactions, and the navigation settings. The on-disk
//! format is plain JSON so project files stay hand-editable and
//! diff-friendly.

pub mod project;

pub use project::*;
