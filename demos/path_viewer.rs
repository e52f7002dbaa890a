//! Windowed demo: a synthetic point-cloud room with an editable camera
//! path. Pass a project file path to start from a saved path instead of
//! the built-in one.

use anyhow::Result;
use nalgebra::Point3;
use splatnav_core::{CameraPose, NavSettings, WaypointStore};
use splatnav_nav::Navigator;
use splatnav_viewer::ViewerApp;

fn seed_store() -> WaypointStore {
    let mut store = WaypointStore::new();
    store.add(CameraPose::from_position(Point3::new(0.0, 1.5, 9.0)));
    store.add(CameraPose::from_position(Point3::new(5.0, 1.5, 3.0)));
    store.add(CameraPose::from_position(Point3::new(3.0, 2.5, -4.0)));
    store.add(CameraPose::from_position(Point3::new(-4.0, 2.0, -4.0)));
    store
}

/// Point grid standing in for a real splat scene
fn scene_points() -> Vec<Point3<f32>> {
    let mut points = Vec::new();
    for x in -20..=20 {
        for z in -20..=20 {
            points.push(Point3::new(x as f32 * 0.5, 0.0, z as f32 * 0.5));
        }
    }
    for i in 0..400 {
        let angle = i as f32 * 0.1;
        let radius = 3.0 + (i as f32 * 0.013).sin();
        points.push(Point3::new(
            angle.cos() * radius,
            (i as f32 * 0.01) % 3.0,
            angle.sin() * radius,
        ));
    }
    points
}

fn main() -> Result<()> {
    env_logger::init();

    let (store, settings) = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading project from {}", path);
            splatnav_io::load_project(&path)?
        }
        None => (seed_store(), NavSettings::default()),
    };

    let navigator = Navigator::with_store(store, settings);
    let mut app = ViewerApp::new(navigator).with_title("splatnav path viewer");
    app.set_scene_points(&scene_points(), [0.6, 0.7, 0.8]);
    app.run()?;
    Ok(())
}
