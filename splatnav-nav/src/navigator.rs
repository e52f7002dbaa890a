//! Navigator facade: one authoritative camera pose per frame
//!
//! Owns the waypoint store, the derived sampled path, the progress pair,
//! the mode controller and the frame animator, and wires them together
//! in a single-threaded, frame-driven loop. Within one frame, input
//! events are applied first, then the path lookup, and the resulting
//! pose is written to the external camera exactly once.

use crate::animator::{AnimatorEvent, FrameAnimator};
use crate::camera::EngineCamera;
use crate::modes::{CameraMode, ControlState, ModeController};
use crate::path::{waypoint_space, SampledPath};
use crate::progress::ProgressTracker;
use splatnav_core::{CameraPose, Interaction, NavSettings, ScrollStyle, WaypointId, WaypointStore};

/// Fraction of the path a Forward/Backward nudge button moves the target
const NUDGE_FRACTION: f32 = 0.05;

/// An interaction fired by the camera crossing its waypoint this frame
#[derive(Debug, Clone, PartialEq)]
pub struct FiredInteraction {
    pub waypoint: WaypointId,
    pub interaction: Interaction,
}

/// The camera path navigation engine.
pub struct Navigator {
    store: WaypointStore,
    settings: NavSettings,
    path: SampledPath,
    built_revision: Option<u64>,
    built_samples: usize,
    progress: ProgressTracker,
    modes: ModeController,
    animator: FrameAnimator,
    /// Progress value the in-flight transition lands on
    transition_end: Option<f32>,
    /// Last waypoint-space position, for edge-triggered interaction firing
    waypoint_mark: f32,
    /// The one waypoint currently open for interaction editing
    open_editor: Option<WaypointId>,
}

impl Navigator {
    pub fn new(settings: NavSettings) -> Self {
        Self::with_store(WaypointStore::new(), settings)
    }

    pub fn with_store(store: WaypointStore, settings: NavSettings) -> Self {
        let mut nav = Self {
            store,
            settings,
            path: SampledPath::empty(),
            built_revision: None,
            built_samples: 0,
            progress: ProgressTracker::new(),
            modes: ModeController::new(),
            animator: FrameAnimator::new(),
            transition_end: None,
            waypoint_mark: 0.0,
            open_editor: None,
        };
        nav.sync_path();
        nav
    }

    // ---- UI read surface -------------------------------------------------

    pub fn store(&self) -> &WaypointStore {
        &self.store
    }

    /// Mutable waypoint access for the editing panels. Structural edits
    /// are picked up on the next tick through the revision counter.
    pub fn store_mut(&mut self) -> &mut WaypointStore {
        &mut self.store
    }

    /// Replace the whole waypoint list (project load). Resets progress
    /// to the path start and forces a rebuild on the next tick; a fresh
    /// store's revision counter is not comparable to the old one.
    pub fn set_store(&mut self, store: WaypointStore) {
        self.store = store;
        self.built_revision = None;
        self.abort_transition();
        self.progress.snap_to(0.0);
        self.waypoint_mark = 0.0;
        self.open_editor = None;
    }

    pub fn settings(&self) -> &NavSettings {
        &self.settings
    }

    /// Replace the settings; path density changes rebuild on next tick.
    pub fn set_settings(&mut self, settings: NavSettings) {
        self.settings = settings;
    }

    pub fn path(&self) -> &SampledPath {
        &self.path
    }

    pub fn mode(&self) -> CameraMode {
        self.modes.mode()
    }

    pub fn control_state(&self) -> ControlState {
        self.modes.control_state()
    }

    pub fn is_free_fly(&self) -> bool {
        self.modes.is_free_fly()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.modes.is_edit_mode()
    }

    pub fn target_progress(&self) -> f32 {
        self.progress.target()
    }

    pub fn animated_progress(&self) -> f32 {
        self.progress.animated()
    }

    /// Animated progress as `0..100` for the scroll bar
    pub fn scroll_percentage(&self) -> f32 {
        self.progress.percentage()
    }

    // ---- input events ----------------------------------------------------

    /// Wheel input. The camera is only read when a return-to-path
    /// transition must start from the live pose.
    pub fn handle_wheel(&mut self, delta_y: f32, camera: &dyn EngineCamera) {
        // Debounced while the animator owns the camera
        if self.modes.is_transitioning() {
            return;
        }
        if self.modes.is_edit_mode() {
            return;
        }
        match self.modes.mode() {
            // Wheel belongs to the free-flight controls
            CameraMode::Explore => {}
            CameraMode::Tour | CameraMode::Auto => {
                if self.modes.is_free_fly() {
                    match self.settings.scroll_style {
                        ScrollStyle::TransitionOnEngage => self.engage_transition(camera),
                        ScrollStyle::DirectScrub => {
                            self.modes.set_free_fly(false);
                            self.progress.scrub_by(delta_y * self.settings.scroll_speed);
                        }
                    }
                } else {
                    self.progress.scrub_by(delta_y * self.settings.scroll_speed);
                }
            }
        }
    }

    /// Forward/Backward button nudge; `direction` is +-1.
    pub fn adjust_scroll(&mut self, direction: f32) {
        if self.modes.is_transitioning() {
            return;
        }
        let step = (self.progress.max() * NUDGE_FRACTION).max(1.0);
        self.progress.scrub_by(direction.signum() * step);
    }

    pub fn cycle_mode(&mut self) {
        if self.modes.cycle_mode() {
            self.abort_transition();
        }
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        if self.modes.set_mode(mode) {
            self.abort_transition();
        }
    }

    pub fn set_free_fly(&mut self, enabled: bool) {
        self.modes.set_free_fly(enabled);
    }

    // ---- edit-mode bridge ------------------------------------------------

    /// Enter or leave edit mode; entering forces Explore for authoring.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if self.modes.set_edit_mode(enabled) {
            self.abort_transition();
        }
        if !enabled {
            self.open_editor = None;
        }
    }

    /// Append a waypoint captured from the live camera
    pub fn add_waypoint_from_camera(&mut self, camera: &dyn EngineCamera) -> WaypointId {
        self.store.add(camera.pose())
    }

    /// Overwrite a waypoint's pose with the live camera pose
    pub fn capture_current_pose(&mut self, id: WaypointId, camera: &dyn EngineCamera) {
        if let Some(index) = self.store.index_of(id) {
            self.store.set_pose(index, camera.pose());
        } else {
            log::warn!("capture_current_pose: waypoint {:?} no longer exists", id);
        }
    }

    /// The waypoint currently open for interaction editing, if any
    pub fn interaction_editor(&self) -> Option<WaypointId> {
        self.open_editor
    }

    /// Open the interaction editor for one waypoint, closing any other
    pub fn open_interaction_editor(&mut self, id: WaypointId) {
        if self.store.index_of(id).is_some() {
            self.open_editor = Some(id);
        }
    }

    /// Close the editor; no side effects on other waypoints
    pub fn close_interaction_editor(&mut self) {
        self.open_editor = None;
    }

    // ---- per-frame tick --------------------------------------------------

    /// Advance one frame and write the authoritative pose to `camera`.
    ///
    /// Returns the interactions fired by waypoint crossings this frame.
    /// While the user's flight controls own the camera the navigator
    /// writes nothing.
    pub fn tick(&mut self, camera: &mut dyn EngineCamera) -> Vec<FiredInteraction> {
        self.sync_path();
        let mut fired = Vec::new();

        if self.modes.is_transitioning() {
            match self.animator.tick() {
                Some(AnimatorEvent::Pose(pose)) => camera.set_pose(&pose),
                Some(AnimatorEvent::Completed(pose)) => {
                    camera.set_pose(&pose);
                    let end = self.transition_end.take().unwrap_or(self.progress.target());
                    self.progress.snap_to(end);
                    self.waypoint_mark =
                        waypoint_space(end, self.path.max_progress(), self.store.len());
                    self.modes.finish_transition();
                }
                // A lost animation must not wedge the state machine
                None => self.abort_transition(),
            }
            return fired;
        }

        if self.modes.user_owns_camera() {
            return fired;
        }

        if self.path.is_empty() {
            return fired;
        }

        if self.modes.mode() == CameraMode::Auto {
            self.progress.scrub_by(self.settings.auto_speed);
        }

        let animated = self.progress.approach(self.settings.scroll_smoothing);
        if let (Some(position), Some(rotation)) = (
            self.path.position_at(animated),
            self.path.rotation_at(animated, self.settings.swing_damping),
        ) {
            camera.set_pose(&CameraPose::new(position, rotation));
        }

        let mark = waypoint_space(animated, self.path.max_progress(), self.store.len());
        self.collect_crossings(mark, &mut fired);
        self.waypoint_mark = mark;
        fired
    }

    // ---- internals -------------------------------------------------------

    fn sync_path(&mut self) {
        let stale = self.built_revision != Some(self.store.revision())
            || self.built_samples != self.settings.samples_per_segment;
        if !stale {
            return;
        }
        self.path = SampledPath::build(self.store.waypoints(), self.settings.samples_per_segment);
        self.built_revision = Some(self.store.revision());
        self.built_samples = self.settings.samples_per_segment;
        self.progress.set_max(self.path.max_progress());
        self.waypoint_mark = waypoint_space(
            self.progress.animated(),
            self.path.max_progress(),
            self.store.len(),
        );
        // A transition landing spot may no longer exist on the new path
        if let Some(end) = self.transition_end {
            if end > self.path.max_progress() {
                self.abort_transition();
            }
        }
    }

    fn engage_transition(&mut self, camera: &dyn EngineCamera) {
        if self.path.is_empty() {
            self.modes.set_free_fly(false);
            return;
        }
        // Trust the already-tracked target progress instead of
        // re-projecting the live camera onto the path.
        let end = self.progress.target();
        let (Some(position), Some(rotation)) = (
            self.path.position_at(end),
            self.path.rotation_at(end, self.settings.swing_damping),
        ) else {
            self.modes.set_free_fly(false);
            return;
        };
        self.animator.start(
            camera.pose(),
            CameraPose::new(position, rotation),
            self.settings.animation_frames,
        );
        self.transition_end = Some(end);
        self.modes.begin_transition();
    }

    /// Cancel an in-flight transition and restore a consistent rest
    /// state; never invokes the animation's completion path.
    fn abort_transition(&mut self) {
        self.animator.cancel();
        self.transition_end = None;
        self.modes.cancel_transition();
    }

    /// Fire interactions of every waypoint whose integer mark lies
    /// between the previous and the current position, edge-triggered in
    /// travel direction. Resting on a waypoint never re-fires.
    fn collect_crossings(&self, mark: f32, fired: &mut Vec<FiredInteraction>) {
        let old = self.waypoint_mark;
        if (mark - old).abs() < f32::EPSILON {
            return;
        }
        if mark > old {
            let mut k = old.floor() as i64 + 1;
            while k as f32 <= mark {
                self.fire_waypoint(k as usize, fired);
                k += 1;
            }
        } else {
            let mut k = old.ceil() as i64 - 1;
            while k >= 0 && k as f32 >= mark {
                self.fire_waypoint(k as usize, fired);
                k -= 1;
            }
        }
    }

    fn fire_waypoint(&self, index: usize, fired: &mut Vec<FiredInteraction>) {
        if let Some(waypoint) = self.store.get(index) {
            for interaction in &waypoint.interactions {
                fired.push(FiredInteraction {
                    waypoint: waypoint.id,
                    interaction: interaction.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FakeCamera;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn three_waypoint_nav(settings: NavSettings) -> Navigator {
        let mut store = WaypointStore::new();
        store.add(CameraPose::from_position(Point3::new(0.0, 0.0, 0.0)));
        store.add(CameraPose::from_position(Point3::new(10.0, 0.0, 0.0)));
        store.add(CameraPose::from_position(Point3::new(10.0, 10.0, 0.0)));
        Navigator::with_store(store, settings)
    }

    fn settle(nav: &mut Navigator, camera: &mut FakeCamera, frames: usize) {
        for _ in 0..frames {
            nav.tick(camera);
        }
    }

    #[test]
    fn direct_scrub_sets_target_from_wheel_delta() {
        let settings = NavSettings {
            scroll_speed: 0.1,
            ..NavSettings::default()
        };
        let mut nav = three_waypoint_nav(settings);
        let camera = FakeCamera::default();

        nav.handle_wheel(50.0, &camera);
        assert_relative_eq!(nav.target_progress(), 5.0);
    }

    #[test]
    fn wheel_scrub_never_leaves_progress_range() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let camera = FakeCamera::default();
        let max = nav.path().max_progress();

        for _ in 0..10_000 {
            nav.handle_wheel(100.0, &camera);
        }
        assert_eq!(nav.target_progress(), max);
        for _ in 0..10_000 {
            nav.handle_wheel(-100.0, &camera);
        }
        assert_eq!(nav.target_progress(), 0.0);
    }

    #[test]
    fn repeated_nudges_clamp_at_both_ends() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let max = nav.path().max_progress();

        for _ in 0..100 {
            nav.adjust_scroll(1.0);
        }
        assert_eq!(nav.target_progress(), max);
        for _ in 0..100 {
            nav.adjust_scroll(-1.0);
        }
        assert_eq!(nav.target_progress(), 0.0);
    }

    #[test]
    fn tick_writes_exactly_one_pose_per_frame() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let mut camera = FakeCamera::default();

        nav.handle_wheel(100.0, &camera);
        for frame in 1..=50 {
            nav.tick(&mut camera);
            assert_eq!(camera.writes, frame);
        }
    }

    #[test]
    fn locked_camera_follows_path_endpoints() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let mut camera = FakeCamera::default();

        settle(&mut nav, &mut camera, 5);
        assert_relative_eq!(camera.current.position, Point3::new(0.0, 0.0, 0.0));

        // Scrub to the far end and let the animated progress converge
        let max = nav.path().max_progress();
        nav.handle_wheel(max / NavSettings::default().scroll_speed, &camera);
        settle(&mut nav, &mut camera, 400);
        assert_relative_eq!(
            camera.current.position,
            Point3::new(10.0, 10.0, 0.0),
            epsilon = 1e-3
        );
    }

    #[test]
    fn transition_on_engage_returns_to_tracked_target() {
        let mut nav = three_waypoint_nav(NavSettings {
            animation_frames: 30,
            ..NavSettings::default()
        });
        let mut camera = FakeCamera::default();

        // Scrub part-way, then the user grabs the camera and flies off
        nav.handle_wheel(60.0, &camera);
        let target = nav.target_progress();
        settle(&mut nav, &mut camera, 200);
        nav.set_free_fly(true);
        camera.current = CameraPose::from_position(Point3::new(50.0, 50.0, 50.0));

        // First wheel tick hands control to the animator
        nav.handle_wheel(10.0, &camera);
        assert_eq!(nav.control_state(), ControlState::Transitioning);
        assert!(!nav.is_free_fly());

        // Wheel input is debounced while transitioning
        nav.handle_wheel(500.0, &camera);
        assert_relative_eq!(nav.target_progress(), target);

        settle(&mut nav, &mut camera, 30);
        assert_eq!(nav.control_state(), ControlState::Locked);
        assert_relative_eq!(nav.target_progress(), target);
        assert_relative_eq!(nav.animated_progress(), target);
        let expected = nav.path().position_at(target).unwrap();
        assert_relative_eq!(camera.current.position, expected, epsilon = 1e-4);
    }

    #[test]
    fn direct_scrub_variant_skips_transition() {
        let mut nav = three_waypoint_nav(NavSettings {
            scroll_speed: 0.1,
            scroll_style: ScrollStyle::DirectScrub,
            ..NavSettings::default()
        });
        let camera = FakeCamera::default();

        nav.set_free_fly(true);
        nav.handle_wheel(50.0, &camera);
        assert_eq!(nav.control_state(), ControlState::Locked);
        assert!(!nav.is_free_fly());
        assert_relative_eq!(nav.target_progress(), 5.0);
    }

    #[test]
    fn mode_change_cancels_transition_without_completion() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let mut camera = FakeCamera::default();

        nav.set_free_fly(true);
        nav.handle_wheel(1.0, &camera);
        assert_eq!(nav.control_state(), ControlState::Transitioning);
        nav.tick(&mut camera);
        let progress_before = nav.animated_progress();

        // User forces Explore mid-animation
        nav.set_mode(CameraMode::Explore);
        assert_eq!(nav.control_state(), ControlState::Flying);

        // No stuck Transitioning, no completion snap
        nav.set_mode(CameraMode::Tour);
        assert_eq!(nav.control_state(), ControlState::Locked);
        assert_relative_eq!(nav.animated_progress(), progress_before);
    }

    #[test]
    fn explore_wheel_does_not_move_progress() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let camera = FakeCamera::default();

        nav.set_mode(CameraMode::Explore);
        nav.handle_wheel(100.0, &camera);
        assert_eq!(nav.target_progress(), 0.0);
    }

    #[test]
    fn auto_mode_advances_and_clamps() {
        let mut nav = three_waypoint_nav(NavSettings {
            auto_speed: 5.0,
            scroll_smoothing: 1.0,
            ..NavSettings::default()
        });
        let mut camera = FakeCamera::default();

        nav.set_mode(CameraMode::Auto);
        let max = nav.path().max_progress();
        settle(&mut nav, &mut camera, 500);
        assert_relative_eq!(nav.target_progress(), max);
        assert_relative_eq!(nav.animated_progress(), max, epsilon = 1e-3);
    }

    #[test]
    fn edit_mode_forces_explore_and_swallows_wheel() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let mut camera = FakeCamera::default();

        nav.set_edit_mode(true);
        assert_eq!(nav.mode(), CameraMode::Explore);
        nav.handle_wheel(100.0, &camera);
        assert_eq!(nav.target_progress(), 0.0);

        // Navigator never writes the pose while the user is authoring
        let writes = camera.writes;
        nav.tick(&mut camera);
        assert_eq!(camera.writes, writes);
    }

    #[test]
    fn capture_updates_waypoint_and_rebuilds_path() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let mut camera = FakeCamera::new(CameraPose::from_position(Point3::new(5.0, 5.0, 5.0)));

        let id = nav.store().waypoints()[0].id;
        nav.capture_current_pose(id, &camera);
        nav.tick(&mut camera);
        assert_eq!(nav.path().points()[0], Point3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn one_interaction_editor_at_a_time() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let a = nav.store().waypoints()[0].id;
        let b = nav.store().waypoints()[1].id;

        nav.open_interaction_editor(a);
        nav.open_interaction_editor(b);
        assert_eq!(nav.interaction_editor(), Some(b));
        nav.close_interaction_editor();
        assert_eq!(nav.interaction_editor(), None);
    }

    #[test]
    fn crossing_a_waypoint_fires_its_interactions_once() {
        let mut nav = three_waypoint_nav(NavSettings {
            scroll_smoothing: 1.0,
            ..NavSettings::default()
        });
        nav.store_mut().set_interactions(
            1,
            vec![Interaction {
                name: "popup".into(),
                trigger: "arrive".into(),
                effect: "show".into(),
            }],
        );
        let mut camera = FakeCamera::default();
        nav.tick(&mut camera);

        // Jump past waypoint 1 in a single frame
        let max = nav.path().max_progress();
        nav.handle_wheel(max / nav.settings().scroll_speed, &camera);
        let fired: Vec<_> = nav.tick(&mut camera);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].interaction.name, "popup");

        // Resting at the end must not re-fire
        for _ in 0..10 {
            assert!(nav.tick(&mut camera).is_empty());
        }
    }

    #[test]
    fn removing_a_waypoint_shrinks_the_progress_range() {
        let mut nav = three_waypoint_nav(NavSettings::default());
        let mut camera = FakeCamera::default();

        let max_before = nav.path().max_progress();
        nav.handle_wheel(max_before / nav.settings().scroll_speed, &camera);
        nav.store_mut().remove(2);
        nav.tick(&mut camera);
        assert!(nav.path().max_progress() < max_before);
        assert!(nav.target_progress() <= nav.path().max_progress());
    }

    #[test]
    fn degenerate_single_waypoint_is_a_stationary_camera() {
        let mut store = WaypointStore::new();
        store.add(CameraPose::from_position(Point3::new(1.0, 2.0, 3.0)));
        let mut nav = Navigator::with_store(store, NavSettings::default());
        let mut camera = FakeCamera::default();

        let fake = FakeCamera::default();
        nav.handle_wheel(100.0, &fake);
        settle(&mut nav, &mut camera, 10);
        assert_relative_eq!(camera.current.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(nav.target_progress(), 0.0);
    }
}
