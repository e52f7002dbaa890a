//! Sampled camera path derived from the waypoint list
//!
//! Positions are sampled from a uniform Catmull-Rom spline through the
//! waypoint positions; rotation keyframes are exactly the waypoint
//! orientations and are interpolated separately at playback time.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use splatnav_core::Waypoint;

/// Derived, read-only sampling of the waypoint path.
///
/// `points[0]` equals the first waypoint's position and the last sample
/// equals the last waypoint's position exactly; intermediate samples lie
/// on the spline between consecutive waypoints. Rebuilt whenever the
/// waypoint list's length or any pose changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPath {
    points: Vec<Point3<f32>>,
    rotations: Vec<UnitQuaternion<f32>>,
}

impl SampledPath {
    /// An empty path (no waypoints authored yet)
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            rotations: Vec::new(),
        }
    }

    /// Build the sampled path from the current waypoint list.
    ///
    /// Pure function of its inputs: building twice from an unchanged
    /// list yields bit-identical output.
    pub fn build(waypoints: &[Waypoint], samples_per_segment: usize) -> Self {
        let rotations: Vec<_> = waypoints.iter().map(|w| w.pose.rotation).collect();
        match waypoints.len() {
            0 => Self::empty(),
            1 => Self {
                points: vec![waypoints[0].pose.position],
                rotations,
            },
            n => {
                let per_segment = samples_per_segment.max(1);
                let mut points = Vec::with_capacity((n - 1) * per_segment + 1);
                for segment in 0..n - 1 {
                    // Clamped phantom controls at both path ends
                    let p0 = waypoints[segment.saturating_sub(1)].pose.position;
                    let p1 = waypoints[segment].pose.position;
                    let p2 = waypoints[segment + 1].pose.position;
                    let p3 = waypoints[(segment + 2).min(n - 1)].pose.position;
                    for step in 0..per_segment {
                        let t = step as f32 / per_segment as f32;
                        points.push(catmull_rom(&p0, &p1, &p2, &p3, t));
                    }
                }
                // Final waypoint position, exact
                points.push(waypoints[n - 1].pose.position);
                Self { points, rotations }
            }
        }
    }

    /// Number of position samples (N)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Upper bound of the progress range `[0, N-1]`
    pub fn max_progress(&self) -> f32 {
        self.points.len().saturating_sub(1) as f32
    }

    /// Position samples
    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    /// Rotation keyframes, one per waypoint
    pub fn rotations(&self) -> &[UnitQuaternion<f32>] {
        &self.rotations
    }

    /// Position at a progress value, linearly blended between the
    /// bracketing sample pair. Progress is clamped to `[0, N-1]`.
    pub fn position_at(&self, progress: f32) -> Option<Point3<f32>> {
        if self.points.is_empty() {
            return None;
        }
        let progress = progress.clamp(0.0, self.max_progress());
        let floor = progress.floor() as usize;
        let ceil = (floor + 1).min(self.points.len() - 1);
        let frac = progress - floor as f32;
        let a = self.points[floor];
        let b = self.points[ceil];
        Some(a + (b - a) * frac)
    }

    /// Orientation at a progress value.
    ///
    /// The bracketing keyframe pair is selected with the same fractional
    /// progress used for position, then spherically interpolated.
    /// `swing_damping` scales the interpolation factor: 0 follows the
    /// slerp fully, 1 holds the segment-start keyframe. With a single
    /// keyframe that orientation is returned regardless of progress.
    pub fn rotation_at(&self, progress: f32, swing_damping: f32) -> Option<UnitQuaternion<f32>> {
        match self.rotations.len() {
            0 => None,
            1 => Some(self.rotations[0]),
            keyframes => {
                let max = self.max_progress();
                if max <= 0.0 {
                    return Some(self.rotations[0]);
                }
                let segments = (keyframes - 1) as f32;
                let segment_t = (progress.clamp(0.0, max) / max) * segments;
                let index = (segment_t.floor() as usize).min(keyframes - 2);
                let frac = segment_t - index as f32;
                let damped = frac * (1.0 - swing_damping.clamp(0.0, 1.0));
                let a = self.rotations[index];
                let b = self.rotations[index + 1];
                // try_slerp fails only for antipodal orientations; hold
                // the segment start keyframe in that case.
                Some(a.try_slerp(&b, damped, 1.0e-6).unwrap_or(a))
            }
        }
    }
}

impl Default for SampledPath {
    fn default() -> Self {
        Self::empty()
    }
}

/// Uniform Catmull-Rom interpolation between `p1` and `p2`
fn catmull_rom(
    p0: &Point3<f32>,
    p1: &Point3<f32>,
    p2: &Point3<f32>,
    p3: &Point3<f32>,
    t: f32,
) -> Point3<f32> {
    let t2 = t * t;
    let t3 = t2 * t;

    let h1 = -0.5 * t3 + t2 - 0.5 * t;
    let h2 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let h3 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let h4 = 0.5 * t3 - 0.5 * t2;

    Point3::from(
        p0.coords * h1 + p1.coords * h2 + p2.coords * h3 + p3.coords * h4,
    )
}

/// Progress expressed in waypoint-segment space: integer part is the
/// waypoint index, fractional part the position within the segment.
pub fn waypoint_space(progress: f32, max_progress: f32, waypoint_count: usize) -> f32 {
    if max_progress <= 0.0 || waypoint_count < 2 {
        return 0.0;
    }
    (progress.clamp(0.0, max_progress) / max_progress) * (waypoint_count - 1) as f32
}
