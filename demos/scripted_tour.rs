//! Headless tour: authors a small path, scrubs along it and prints the
//! camera pose whenever a waypoint is crossed.

use anyhow::Result;
use nalgebra::Point3;
use splatnav_core::{CameraPose, Interaction, NavSettings, WaypointStore};
use splatnav_nav::{FakeCamera, Navigator};

fn main() -> Result<()> {
    env_logger::init();

    let mut store = WaypointStore::new();
    store.add(CameraPose::from_position(Point3::new(0.0, 1.5, 8.0)));
    store.add(CameraPose::from_position(Point3::new(4.0, 1.5, 4.0)));
    store.add(CameraPose::from_position(Point3::new(4.0, 3.0, -2.0)));
    store.add(CameraPose::from_position(Point3::new(-2.0, 2.0, -6.0)));
    store.set_interactions(
        2,
        vec![Interaction {
            name: "balcony-overlook".into(),
            trigger: "arrive".into(),
            effect: "show-label".into(),
        }],
    );

    let settings = NavSettings::default();
    let mut nav = Navigator::with_store(store, settings);
    let mut camera = FakeCamera::default();

    println!(
        "path has {} samples over {} waypoints",
        nav.path().len(),
        nav.store().len()
    );

    // Scrub to the end in wheel-sized steps, then let the animated
    // progress settle on the final waypoint.
    let max = nav.path().max_progress();
    for _ in 0..300 {
        if nav.target_progress() < max {
            nav.handle_wheel(60.0, &camera);
        }
        for hit in nav.tick(&mut camera) {
            let p = camera.current.position;
            println!(
                "fired '{}' at waypoint {:?} (camera at {:.1}, {:.1}, {:.1})",
                hit.interaction.name, hit.waypoint, p.x, p.y, p.z
            );
        }
    }
    let p = camera.current.position;
    println!(
        "tour finished at {:.2}% (camera at {:.1}, {:.1}, {:.1})",
        nav.scroll_percentage(),
        p.x,
        p.y,
        p.z
    );
    Ok(())
}
