//! Scroll progress along the sampled path
//!
//! Two live values: `target` is set instantly by wheel/drag/autoplay
//! input, `animated` is eased toward it once per frame and is what the
//! camera actually follows. At rest both are equal.

/// Target/animated progress pair over the range `[0, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    target: f32,
    animated: f32,
    max: f32,
}

/// Animated progress snaps onto the target below this distance.
const REST_EPSILON: f32 = 1.0e-4;

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            target: 0.0,
            animated: 0.0,
            max: 0.0,
        }
    }

    /// Authoritative desired progress
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Smoothed progress the camera follows
    pub fn animated(&self) -> f32 {
        self.animated
    }

    /// Upper bound of the progress range (`N - 1` path samples)
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Reset the range after a path rebuild, clamping both values into it
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.target = self.target.clamp(0.0, self.max);
        self.animated = self.animated.clamp(0.0, self.max);
    }

    /// Move the target by a signed amount, clamped into range.
    /// This is the immediate, un-animated scrubbing path.
    pub fn scrub_by(&mut self, delta: f32) {
        self.target = (self.target + delta).clamp(0.0, self.max);
    }

    /// Set both values at once (end of a transition animation)
    pub fn snap_to(&mut self, value: f32) {
        let value = value.clamp(0.0, self.max);
        self.target = value;
        self.animated = value;
    }

    /// Ease the animated value toward the target by an exponential
    /// approach factor; returns the new animated progress.
    pub fn approach(&mut self, smoothing: f32) -> f32 {
        let delta = self.target - self.animated;
        if delta.abs() < REST_EPSILON {
            self.animated = self.target;
        } else {
            self.animated += delta * smoothing.clamp(0.0, 1.0);
        }
        self.animated
    }

    /// True when animated and target have converged
    pub fn at_rest(&self) -> bool {
        (self.target - self.animated).abs() < REST_EPSILON
    }

    /// Animated progress as a percentage of the full path
    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.animated / self.max * 100.0
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
