//! Camera mode state machine
//!
//! Selects, each frame, which component supplies the authoritative
//! camera pose. All mode changes go through this controller; nothing
//! else assigns mode or sub-state fields, which keeps the legal-state
//! invariants checkable in one place.
//!
//! Legal combinations:
//! - `Tour`/`Auto` with `Locked` or `Transitioning`
//! - `Explore` with `Flying` (edit mode always implies this one)

use serde::{Deserialize, Serialize};

/// Camera-constraint mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    /// Locked to the authored path, scrubbed by the user
    Tour,
    /// Free user flight
    Explore,
    /// Automatic playback along the path
    Auto,
}

/// Who owns the camera pose within the current mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlState {
    /// The path lookup writes the pose every frame
    Locked,
    /// The user's flight controls own the pose
    Flying,
    /// The frame animator owns the pose until it completes
    Transitioning,
}

/// The mode/sub-state pair plus the cross-cutting coordination flags
/// (free-fly engaged, edit mode). Kept in one record so a frame never
/// observes them half-updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeController {
    mode: CameraMode,
    control: ControlState,
    free_fly: bool,
    edit_mode: bool,
}

impl ModeController {
    pub fn new() -> Self {
        Self {
            mode: CameraMode::Tour,
            control: ControlState::Locked,
            free_fly: false,
            edit_mode: false,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn control_state(&self) -> ControlState {
        self.control
    }

    /// True while the user has grabbed the camera off the path
    pub fn is_free_fly(&self) -> bool {
        self.free_fly
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_transitioning(&self) -> bool {
        self.control == ControlState::Transitioning
    }

    /// True when the user's flight controls own the camera this frame
    pub fn user_owns_camera(&self) -> bool {
        self.control == ControlState::Flying || (self.free_fly && !self.is_transitioning())
    }

    /// Cycle Tour -> Explore -> Auto -> Tour.
    ///
    /// Returns true when an in-flight transition must be cancelled by
    /// the caller. Switching away from Explore always clears free-fly.
    #[must_use]
    pub fn cycle_mode(&mut self) -> bool {
        let next = match self.mode {
            CameraMode::Tour => CameraMode::Explore,
            CameraMode::Explore => CameraMode::Auto,
            CameraMode::Auto => CameraMode::Tour,
        };
        self.set_mode(next)
    }

    /// Switch to a specific mode; see [`Self::cycle_mode`] for the
    /// cancellation contract.
    #[must_use]
    pub fn set_mode(&mut self, mode: CameraMode) -> bool {
        let cancel = self.is_transitioning();
        if self.edit_mode && mode != CameraMode::Explore {
            // Edit mode pins Explore; the UI disables the toggle, this
            // guard is the contract backstop.
            log::warn!("mode change to {:?} ignored while editing", mode);
            return false;
        }
        self.mode = mode;
        match mode {
            CameraMode::Explore => {
                self.control = ControlState::Flying;
            }
            CameraMode::Tour | CameraMode::Auto => {
                self.free_fly = false;
                self.control = ControlState::Locked;
            }
        }
        self.assert_invariants();
        cancel
    }

    /// Engage or release free flight.
    ///
    /// In Tour/Auto this sets the flag only (sub-state stays Locked);
    /// the next wheel tick decides how the camera returns to the path.
    /// Ignored while a transition owns the camera.
    pub fn set_free_fly(&mut self, enabled: bool) {
        if self.is_transitioning() {
            return;
        }
        self.free_fly = enabled;
        self.assert_invariants();
    }

    /// Enter or leave edit mode. Entering forces Explore so the camera
    /// is freely positionable; leaving keeps Explore (no restore).
    ///
    /// Returns true when an in-flight transition must be cancelled.
    #[must_use]
    pub fn set_edit_mode(&mut self, enabled: bool) -> bool {
        let mut cancel = false;
        if enabled && !self.edit_mode {
            cancel = self.set_mode(CameraMode::Explore);
        }
        self.edit_mode = enabled;
        self.assert_invariants();
        cancel
    }

    /// Hand control to the frame animator. Only legal from a Locked
    /// Tour/Auto state; the free-fly flag is consumed by the engage.
    pub fn begin_transition(&mut self) {
        debug_assert!(
            matches!(self.mode, CameraMode::Tour | CameraMode::Auto)
                && self.control == ControlState::Locked,
            "transition engaged from {:?}/{:?}",
            self.mode,
            self.control
        );
        self.free_fly = false;
        self.control = ControlState::Transitioning;
        self.assert_invariants();
    }

    /// Animator reported completion; return to Locked.
    pub fn finish_transition(&mut self) {
        debug_assert!(self.is_transitioning());
        self.control = ControlState::Locked;
        self.assert_invariants();
    }

    /// A cancelled animation must not leave the controller stuck in
    /// Transitioning.
    pub fn cancel_transition(&mut self) {
        if self.is_transitioning() {
            self.control = match self.mode {
                CameraMode::Explore => ControlState::Flying,
                _ => ControlState::Locked,
            };
        }
        self.assert_invariants();
    }

    fn assert_invariants(&self) {
        debug_assert!(
            match self.mode {
                CameraMode::Explore => self.control == ControlState::Flying,
                CameraMode::Tour | CameraMode::Auto =>
                    self.control != ControlState::Flying,
            },
            "illegal mode/control pair {:?}/{:?}",
            self.mode,
            self.control
        );
        debug_assert!(
            !self.edit_mode || self.mode == CameraMode::Explore,
            "edit mode requires Explore"
        );
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_all_modes() {
        let mut modes = ModeController::new();
        assert_eq!(modes.mode(), CameraMode::Tour);
        let _ = modes.cycle_mode();
        assert_eq!(modes.mode(), CameraMode::Explore);
        assert_eq!(modes.control_state(), ControlState::Flying);
        let _ = modes.cycle_mode();
        assert_eq!(modes.mode(), CameraMode::Auto);
        assert_eq!(modes.control_state(), ControlState::Locked);
        let _ = modes.cycle_mode();
        assert_eq!(modes.mode(), CameraMode::Tour);
    }

    #[test]
    fn leaving_explore_clears_free_fly() {
        let mut modes = ModeController::new();
        let _ = modes.set_mode(CameraMode::Explore);
        modes.set_free_fly(true);
        let _ = modes.set_mode(CameraMode::Tour);
        assert!(!modes.is_free_fly());
        assert_eq!(modes.control_state(), ControlState::Locked);
    }

    #[test]
    fn edit_mode_forces_explore_and_does_not_restore() {
        let mut modes = ModeController::new();
        let _ = modes.set_mode(CameraMode::Auto);
        let _ = modes.set_edit_mode(true);
        assert_eq!(modes.mode(), CameraMode::Explore);
        assert!(modes.is_edit_mode());

        let _ = modes.set_edit_mode(false);
        // Explicit design choice: the pre-edit mode is not restored
        assert_eq!(modes.mode(), CameraMode::Explore);
    }

    #[test]
    fn transition_round_trip() {
        let mut modes = ModeController::new();
        modes.set_free_fly(true);
        modes.begin_transition();
        assert!(modes.is_transitioning());
        assert!(!modes.is_free_fly());
        modes.finish_transition();
        assert_eq!(modes.control_state(), ControlState::Locked);
    }

    #[test]
    fn cancel_never_leaves_transitioning() {
        let mut modes = ModeController::new();
        modes.begin_transition();
        modes.cancel_transition();
        assert!(!modes.is_transitioning());
        assert_eq!(modes.control_state(), ControlState::Locked);
    }

    #[test]
    fn mode_change_requests_cancel_of_inflight_transition() {
        let mut modes = ModeController::new();
        modes.begin_transition();
        let cancel = modes.set_mode(CameraMode::Explore);
        assert!(cancel);
        assert_eq!(modes.control_state(), ControlState::Flying);
    }
}
