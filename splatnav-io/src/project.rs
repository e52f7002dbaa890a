//! JSON project files: waypoints, interactions and settings
//!
//! The file is a faithful dump of the authored state. Stable waypoint
//! ids are a session concept and are not persisted; a load reassigns
//! fresh ids in list order.

use nalgebra::{Point3, Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use splatnav_core::{
    CameraPose, Error, Interaction, NavSettings, Result, WaypointStore,
};
use std::fs;
use std::path::Path;

/// Current on-disk format version
pub const PROJECT_VERSION: u32 = 1;

/// One persisted waypoint.
///
/// `rotation` is kept as raw JSON so files written by older tools or
/// edited by hand degrade gracefully: anything that is not a finite
/// `{x, y, z, w}` quaternion falls back to the identity orientation
/// with a logged warning instead of rejecting the whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub rotation: Value,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// Root of the project file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default = "default_version")]
    pub version: u32,
    pub waypoints: Vec<WaypointRecord>,
    #[serde(default)]
    pub settings: NavSettings,
}

fn default_version() -> u32 {
    PROJECT_VERSION
}

impl ProjectFile {
    /// Snapshot the live store and settings for saving
    pub fn from_store(store: &WaypointStore, settings: &NavSettings) -> Self {
        let waypoints = store
            .iter()
            .map(|w| WaypointRecord {
                x: w.pose.position.x,
                y: w.pose.position.y,
                z: w.pose.position.z,
                rotation: encode_rotation(&w.pose.rotation),
                interactions: w.interactions.clone(),
            })
            .collect();
        Self {
            version: PROJECT_VERSION,
            waypoints,
            settings: settings.clone(),
        }
    }

    /// Rebuild a waypoint store from the persisted records.
    ///
    /// Ids are freshly assigned in list order.
    pub fn into_store(self) -> (WaypointStore, NavSettings) {
        let mut store = WaypointStore::new();
        for (index, record) in self.waypoints.iter().enumerate() {
            let position = Point3::new(record.x, record.y, record.z);
            let rotation = decode_rotation(&record.rotation, index);
            store.add(CameraPose::new(position, rotation));
            if !record.interactions.is_empty() {
                store.set_interactions(index, record.interactions.clone());
            }
        }
        (store, self.settings)
    }
}

fn encode_rotation(rotation: &UnitQuaternion<f32>) -> Value {
    let q = rotation.quaternion();
    serde_json::json!({ "x": q.i, "y": q.j, "z": q.k, "w": q.w })
}

fn finite_component(value: &Value, key: &str) -> Option<f32> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .map(|f| f as f32)
        .filter(|f| f.is_finite())
}

/// Decode an `{x, y, z, w}` quaternion, tolerating malformed input. A
/// record missing any component yields identity with a warning.
fn decode_rotation(value: &Value, index: usize) -> UnitQuaternion<f32> {
    if value.is_null() {
        return UnitQuaternion::identity();
    }
    let components = finite_component(value, "x").and_then(|x| {
        finite_component(value, "y").and_then(|y| {
            finite_component(value, "z")
                .and_then(|z| finite_component(value, "w").map(|w| (x, y, z, w)))
        })
    });
    match components {
        Some((x, y, z, w)) => {
            let q = Quaternion::new(w, x, y, z);
            match UnitQuaternion::try_new(q, 1.0e-6) {
                Some(unit) => unit,
                None => {
                    log::warn!(
                        "waypoint {}: zero-length rotation quaternion, using identity",
                        index
                    );
                    UnitQuaternion::identity()
                }
            }
        }
        None => {
            log::warn!(
                "waypoint {}: malformed rotation {:?}, using identity",
                index,
                value
            );
            UnitQuaternion::identity()
        }
    }
}

/// Write a project file as pretty-printed JSON
pub fn save_project<P: AsRef<Path>>(
    path: P,
    store: &WaypointStore,
    settings: &NavSettings,
) -> Result<()> {
    let project = ProjectFile::from_store(store, settings);
    let json = serde_json::to_string_pretty(&project)
        .map_err(|e| Error::Project(format!("serialization failed: {}", e)))?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a project file and rebuild the waypoint store and settings
pub fn load_project<P: AsRef<Path>>(path: P) -> Result<(WaypointStore, NavSettings)> {
    let json = fs::read_to_string(&path)?;
    let project: ProjectFile = serde_json::from_str(&json).map_err(|e| {
        Error::Project(format!(
            "{}: not a valid project file: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    if project.version > PROJECT_VERSION {
        log::warn!(
            "project file version {} is newer than supported version {}",
            project.version,
            PROJECT_VERSION
        );
    }
    Ok(project.into_store())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use splatnav_nav::SampledPath;
    use tempfile::NamedTempFile;

    fn sample_store() -> WaypointStore {
        let mut store = WaypointStore::new();
        store.add(CameraPose::new(
            Point3::new(0.0, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.3, 0.0),
        ));
        store.add(CameraPose::new(
            Point3::new(10.0, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(0.2, -0.5, 0.1),
        ));
        store.add(CameraPose::from_position(Point3::new(10.0, 10.0, 0.0)));
        store.set_interactions(
            1,
            vec![Interaction {
                name: "popup".into(),
                trigger: "arrive".into(),
                effect: "show-info".into(),
            }],
        );
        store
    }

    #[test]
    fn save_load_round_trip() {
        let store = sample_store();
        let settings = NavSettings {
            scroll_speed: 0.2,
            swing_damping: 0.5,
            ..NavSettings::default()
        };
        let file = NamedTempFile::new().unwrap();

        save_project(file.path(), &store, &settings).unwrap();
        let (loaded, loaded_settings) = load_project(file.path()).unwrap();

        assert_eq!(loaded.len(), store.len());
        for (a, b) in loaded.iter().zip(store.iter()) {
            assert_eq!(a.pose.position, b.pose.position);
            assert_relative_eq!(
                a.pose.rotation.angle_to(&b.pose.rotation),
                0.0,
                epsilon = 1e-6
            );
            assert_eq!(a.interactions, b.interactions);
        }
        assert_eq!(loaded_settings, settings);
    }

    #[test]
    fn reloaded_store_rebuilds_an_identical_path() {
        let store = sample_store();
        let settings = NavSettings::default();
        let file = NamedTempFile::new().unwrap();

        save_project(file.path(), &store, &settings).unwrap();
        let (loaded, loaded_settings) = load_project(file.path()).unwrap();

        let before = SampledPath::build(store.waypoints(), settings.samples_per_segment);
        let after = SampledPath::build(loaded.waypoints(), loaded_settings.samples_per_segment);
        assert_eq!(before, after);
    }

    #[test]
    fn malformed_rotation_degrades_to_identity() {
        let json = r#"{
            "waypoints": [
                { "x": 1.0, "y": 2.0, "z": 3.0, "rotation": "garbage" },
                { "x": 4.0, "y": 5.0, "z": 6.0, "rotation": { "x": 0.1, "y": 0.2 } },
                { "x": 7.0, "y": 8.0, "z": 9.0, "rotation": { "x": 0.0, "y": 0.0, "z": 0.0, "w": 0.0 } },
                { "x": 0.0, "y": 0.0, "z": 0.0 }
            ]
        }"#;
        let project: ProjectFile = serde_json::from_str(json).unwrap();
        let (store, settings) = project.into_store();

        assert_eq!(store.len(), 4);
        for waypoint in store.iter() {
            assert_eq!(waypoint.pose.rotation, UnitQuaternion::identity());
        }
        assert_eq!(settings, NavSettings::default());
    }

    #[test]
    fn loaded_ids_are_fresh_and_ordered() {
        let store = sample_store();
        let file = NamedTempFile::new().unwrap();
        save_project(file.path(), &store, &NavSettings::default()).unwrap();

        let (loaded, _) = load_project(file.path()).unwrap();
        let ids: Vec<_> = loaded.iter().map(|w| w.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_project("/nonexistent/project.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn invalid_json_is_a_project_error() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "{ not json").unwrap();
        let err = load_project(file.path()).unwrap_err();
        assert!(matches!(err, Error::Project(_)));
    }
}
