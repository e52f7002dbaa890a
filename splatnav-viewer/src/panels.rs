//! egui panels: scroll controls, waypoint editing, settings, project menu

use splatnav_core::{Axis, Interaction, NavSettings, ScrollStyle, WaypointId};
use splatnav_nav::{CameraMode, Navigator};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::camera::FlyCamera;

/// UI state that lives outside the navigation engine.
///
/// Keyed by stable waypoint ids, so collapse flags stay attached to the
/// same logical waypoint when earlier entries are removed.
#[derive(Debug, Default)]
pub struct PanelState {
    pub collapsed: HashSet<WaypointId>,
    pub show_settings: bool,
    pub status: Option<String>,
    pub project_path: Option<PathBuf>,
}

impl PanelState {
    pub fn is_collapsed(&self, id: WaypointId) -> bool {
        self.collapsed.contains(&id)
    }

    pub fn toggle_collapsed(&mut self, id: WaypointId) {
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }

    /// Drop collapse flags of waypoints that no longer exist
    pub fn retain_existing(&mut self, existing: &HashSet<WaypointId>) {
        self.collapsed.retain(|id| existing.contains(id));
    }
}

/// Deferred structural edits, applied after the waypoint list has been
/// drawn so the UI never mutates the store it is iterating.
enum WaypointOp {
    SetPosition(usize, Axis, f32),
    SetRotation(usize, Axis, f32),
    CaptureFromCamera(WaypointId),
    Remove(usize),
    OpenInteractions(WaypointId),
}

/// Draw all panels for one frame
pub fn draw_panels(
    ctx: &egui::Context,
    nav: &mut Navigator,
    camera: &FlyCamera,
    state: &mut PanelState,
) {
    draw_scroll_controls(ctx, nav);
    draw_project_menu(ctx, nav, state);
    if state.show_settings {
        draw_settings(ctx, nav);
    }
    if nav.is_edit_mode() {
        draw_waypoint_panel(ctx, nav, camera, state);
        draw_interaction_editor(ctx, nav);
    }

    let existing: HashSet<WaypointId> = nav.store().iter().map(|w| w.id).collect();
    state.retain_existing(&existing);
}

fn draw_scroll_controls(ctx: &egui::Context, nav: &mut Navigator) {
    egui::TopBottomPanel::bottom("scroll_controls").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("<").clicked() {
                nav.adjust_scroll(-1.0);
            }
            let progress = nav.scroll_percentage();
            ui.add(
                egui::ProgressBar::new(progress / 100.0)
                    .text(format!("{:.0}%", progress))
                    .desired_width(240.0),
            );
            if ui.button(">").clicked() {
                nav.adjust_scroll(1.0);
            }

            ui.separator();

            let mode_label = match nav.mode() {
                CameraMode::Tour => "Tour",
                CameraMode::Explore => "Explore",
                CameraMode::Auto => "Auto",
            };
            if ui.button(format!("Mode: {}", mode_label)).clicked() {
                nav.cycle_mode();
            }

            let mut free_fly = nav.is_free_fly();
            if ui.checkbox(&mut free_fly, "Free fly").changed() {
                nav.set_free_fly(free_fly);
            }

            let mut edit = nav.is_edit_mode();
            if ui.checkbox(&mut edit, "Edit path").changed() {
                nav.set_edit_mode(edit);
            }
        });
    });
}

fn draw_project_menu(ctx: &egui::Context, nav: &mut Navigator, state: &mut PanelState) {
    egui::TopBottomPanel::top("project_menu").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Save project").clicked() {
                let picked = rfd::FileDialog::new()
                    .add_filter("project", &["json"])
                    .save_file();
                if let Some(path) = picked {
                    match splatnav_io::save_project(&path, nav.store(), nav.settings()) {
                        Ok(()) => {
                            state.status = Some(format!("saved {}", path.display()));
                            state.project_path = Some(path);
                        }
                        Err(e) => state.status = Some(format!("save failed: {}", e)),
                    }
                }
            }
            if ui.button("Load project").clicked() {
                let picked = rfd::FileDialog::new()
                    .add_filter("project", &["json"])
                    .pick_file();
                if let Some(path) = picked {
                    match splatnav_io::load_project(&path) {
                        Ok((store, settings)) => {
                            nav.set_store(store);
                            nav.set_settings(settings);
                            state.collapsed.clear();
                            state.status = Some(format!("loaded {}", path.display()));
                            state.project_path = Some(path);
                        }
                        Err(e) => state.status = Some(format!("load failed: {}", e)),
                    }
                }
            }
            ui.checkbox(&mut state.show_settings, "Settings");
            if let Some(status) = &state.status {
                ui.separator();
                ui.label(status);
            }
        });
    });
}

fn draw_settings(ctx: &egui::Context, nav: &mut Navigator) {
    let mut settings = nav.settings().clone();
    let mut changed = false;

    egui::Window::new("Settings").show(ctx, |ui| {
        changed |= ui
            .add(egui::Slider::new(&mut settings.scroll_speed, 0.01..=0.5).text("Scroll speed"))
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut settings.animation_frames, 30..=240)
                    .text("Transition frames"),
            )
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut settings.fly_speed, 0.01..=1.0).text("Fly speed"))
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut settings.rotation_sensitivity, 1000.0..=100000.0)
                    .text("Rotation sensitivity"),
            )
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut settings.swing_damping, 0.0..=1.0).text("Swing damping"))
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut settings.samples_per_segment, 5..=50)
                    .text("Path samples per segment"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut settings.scroll_smoothing, 0.01..=0.5)
                    .text("Scroll smoothing"),
            )
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut settings.auto_speed, 0.01..=0.5).text("Auto speed"))
            .changed();

        egui::ComboBox::from_label("After free fly")
            .selected_text(match settings.scroll_style {
                ScrollStyle::TransitionOnEngage => "Animate back to path",
                ScrollStyle::DirectScrub => "Resume scrubbing",
            })
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(
                        &mut settings.scroll_style,
                        ScrollStyle::TransitionOnEngage,
                        "Animate back to path",
                    )
                    .changed();
                changed |= ui
                    .selectable_value(
                        &mut settings.scroll_style,
                        ScrollStyle::DirectScrub,
                        "Resume scrubbing",
                    )
                    .changed();
            });
    });

    if changed {
        nav.set_settings(settings);
    }
}

fn draw_waypoint_panel(
    ctx: &egui::Context,
    nav: &mut Navigator,
    camera: &FlyCamera,
    state: &mut PanelState,
) {
    let mut ops: Vec<WaypointOp> = Vec::new();
    let mut add_from_camera = false;

    egui::SidePanel::right("waypoints")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading("Waypoints");
            if ui.button("Add waypoint at camera").clicked() {
                add_from_camera = true;
            }
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (index, waypoint) in nav.store().iter().enumerate() {
                    let id = waypoint.id;
                    let open = !state.is_collapsed(id);
                    let header = egui::CollapsingHeader::new(format!("Waypoint {}", index + 1))
                        .id_source(id.0)
                        .open(Some(open))
                        .show(ui, |ui| {
                            ui.label("Position");
                            for axis in Axis::ALL {
                                let mut value = waypoint.pose.position_component(axis);
                                ui.horizontal(|ui| {
                                    ui.label(axis.label());
                                    if ui
                                        .add(egui::DragValue::new(&mut value).speed(0.05))
                                        .changed()
                                    {
                                        ops.push(WaypointOp::SetPosition(index, axis, value));
                                    }
                                });
                            }

                            ui.label("Rotation (degrees)");
                            for axis in Axis::ALL {
                                let mut degrees =
                                    waypoint.pose.euler_component(axis).to_degrees();
                                ui.horizontal(|ui| {
                                    ui.label(axis.label());
                                    if ui
                                        .add(egui::DragValue::new(&mut degrees).speed(1.0))
                                        .changed()
                                    {
                                        ops.push(WaypointOp::SetRotation(
                                            index,
                                            axis,
                                            degrees.to_radians(),
                                        ));
                                    }
                                });
                            }

                            ui.horizontal(|ui| {
                                if ui.button("Set to current view").clicked() {
                                    ops.push(WaypointOp::CaptureFromCamera(id));
                                }
                                if ui.button("Interactions").clicked() {
                                    ops.push(WaypointOp::OpenInteractions(id));
                                }
                                if ui.button("Remove").clicked() {
                                    ops.push(WaypointOp::Remove(index));
                                }
                            });
                        });
                    if header.header_response.clicked() {
                        state.toggle_collapsed(id);
                    }
                }
            });
        });

    if add_from_camera {
        nav.add_waypoint_from_camera(camera);
    }
    // Removals go last so the other ops still see their original indices
    ops.sort_by_key(|op| matches!(op, WaypointOp::Remove(_)));
    for op in ops {
        match op {
            WaypointOp::SetPosition(index, axis, value) => {
                nav.store_mut().update_position(index, axis, value)
            }
            WaypointOp::SetRotation(index, axis, radians) => {
                nav.store_mut().update_rotation(index, axis, radians)
            }
            WaypointOp::CaptureFromCamera(id) => nav.capture_current_pose(id, camera),
            WaypointOp::OpenInteractions(id) => nav.open_interaction_editor(id),
            WaypointOp::Remove(index) => {
                nav.store_mut().remove(index);
            }
        }
    }
}

fn draw_interaction_editor(ctx: &egui::Context, nav: &mut Navigator) {
    let Some(id) = nav.interaction_editor() else {
        return;
    };
    let Some(index) = nav.store().index_of(id) else {
        nav.close_interaction_editor();
        return;
    };

    let mut interactions = nav.store().get(index).map(|w| w.interactions.clone()).unwrap_or_default();
    let mut changed = false;
    let mut close = false;

    egui::Window::new(format!("Interactions: waypoint {}", index + 1)).show(ctx, |ui| {
        let mut remove_at: Option<usize> = None;
        for (i, interaction) in interactions.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                changed |= ui.text_edit_singleline(&mut interaction.name).changed();
                changed |= ui.text_edit_singleline(&mut interaction.trigger).changed();
                changed |= ui.text_edit_singleline(&mut interaction.effect).changed();
                if ui.button("x").clicked() {
                    remove_at = Some(i);
                }
            });
        }
        if let Some(i) = remove_at {
            interactions.remove(i);
            changed = true;
        }
        ui.horizontal(|ui| {
            if ui.button("Add interaction").clicked() {
                interactions.push(Interaction {
                    name: String::new(),
                    trigger: String::new(),
                    effect: String::new(),
                });
                changed = true;
            }
            if ui.button("Close").clicked() {
                close = true;
            }
        });
    });

    if changed {
        nav.store_mut().set_interactions(index, interactions);
    }
    if close {
        nav.close_interaction_editor();
    }
}

/// Ranges the settings sliders enforce, exposed for tests
pub fn settings_in_panel_ranges(settings: &NavSettings) -> bool {
    (0.01..=0.5).contains(&settings.scroll_speed)
        && (30..=240).contains(&settings.animation_frames)
        && (0.0..=1.0).contains(&settings.swing_damping)
        && (5..=50).contains(&settings.samples_per_segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use splatnav_core::{CameraPose, WaypointStore};

    fn store_with(n: usize) -> WaypointStore {
        let mut store = WaypointStore::new();
        for i in 0..n {
            store.add(CameraPose::from_position(Point3::new(i as f32, 0.0, 0.0)));
        }
        store
    }

    #[test]
    fn collapse_state_survives_removal_of_other_waypoints() {
        let mut store = store_with(3);
        let kept = store.waypoints()[2].id;

        let mut state = PanelState::default();
        state.toggle_collapsed(kept);
        assert!(state.is_collapsed(kept));

        // Remove an earlier waypoint; the collapsed one keeps its flag
        store.remove(0);
        let existing: HashSet<WaypointId> = store.iter().map(|w| w.id).collect();
        state.retain_existing(&existing);
        assert!(state.is_collapsed(kept));
    }

    #[test]
    fn collapse_flags_of_removed_waypoints_are_dropped() {
        let mut store = store_with(2);
        let removed = store.waypoints()[0].id;

        let mut state = PanelState::default();
        state.toggle_collapsed(removed);
        store.remove(0);

        let existing: HashSet<WaypointId> = store.iter().map(|w| w.id).collect();
        state.retain_existing(&existing);
        assert!(!state.is_collapsed(removed));
    }

    #[test]
    fn toggle_collapsed_round_trips() {
        let mut state = PanelState::default();
        let id = WaypointId(7);
        state.toggle_collapsed(id);
        state.toggle_collapsed(id);
        assert!(!state.is_collapsed(id));
    }

    #[test]
    fn default_settings_fit_the_panel_ranges() {
        assert!(settings_in_panel_ranges(&NavSettings::default()));
    }
}
