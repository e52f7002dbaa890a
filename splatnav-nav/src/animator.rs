//! Frame-budgeted pose transitions
//!
//! The animator owns at most one in-flight transition. It is advanced by
//! the per-frame tick, never by a blocked call stack, and can be
//! cancelled at any frame; a cancelled run never reports completion.

use splatnav_core::CameraPose;

/// Symmetric ease-in/ease-out curve used for all transitions
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// A single position+orientation transition over a fixed frame budget.
#[derive(Debug, Clone)]
struct Transition {
    from: CameraPose,
    to: CameraPose,
    total_frames: u32,
    elapsed: u32,
}

impl Transition {
    fn sample(&self, eased: f32) -> CameraPose {
        let position = self.from.position + (self.to.position - self.from.position) * eased;
        // Same eased parameter for both tracks so position and rotation
        // arrive together.
        let rotation = self
            .from
            .rotation
            .try_slerp(&self.to.rotation, eased, 1.0e-6)
            .unwrap_or(self.to.rotation);
        CameraPose::new(position, rotation)
    }
}

/// Result of advancing the animator by one frame
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorEvent {
    /// Transition still running; the pose to apply this frame
    Pose(CameraPose),
    /// Transition reached its target this frame. Reported exactly once
    /// per animation that runs to completion.
    Completed(CameraPose),
}

/// Owns the in-flight transition, if any.
#[derive(Debug, Clone, Default)]
pub struct FrameAnimator {
    active: Option<Transition>,
}

impl FrameAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a transition, replacing any in-flight one without
    /// completing it. A zero frame budget is treated as one frame.
    pub fn start(&mut self, from: CameraPose, to: CameraPose, frames: u32) {
        self.active = Some(Transition {
            from,
            to,
            total_frames: frames.max(1),
            elapsed: 0,
        });
    }

    /// Abandon the in-flight transition. Its completion is never
    /// reported; callers reset their own control state.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Advance one frame. Returns `None` when idle.
    pub fn tick(&mut self) -> Option<AnimatorEvent> {
        let transition = self.active.as_mut()?;
        transition.elapsed += 1;
        if transition.elapsed >= transition.total_frames {
            let done = self.active.take().expect("transition present");
            Some(AnimatorEvent::Completed(done.sample(1.0)))
        } else {
            let t = transition.elapsed as f32 / transition.total_frames as f32;
            let pose = transition.sample(smoothstep(t));
            Some(AnimatorEvent::Pose(pose))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, UnitQuaternion};

    fn poses() -> (CameraPose, CameraPose) {
        let from = CameraPose::from_position(Point3::origin());
        let to = CameraPose::new(
            Point3::new(10.0, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 1.0, 0.0),
        );
        (from, to)
    }

    #[test]
    fn completes_exactly_once_on_final_frame() {
        let (from, to) = poses();
        let mut animator = FrameAnimator::new();
        animator.start(from, to, 10);

        let mut completions = 0;
        for _ in 0..10 {
            match animator.tick() {
                Some(AnimatorEvent::Completed(pose)) => {
                    completions += 1;
                    assert_relative_eq!(pose.position.x, 10.0, epsilon = 1e-5);
                    assert_relative_eq!(pose.rotation.angle_to(&to.rotation), 0.0, epsilon = 1e-5);
                }
                Some(AnimatorEvent::Pose(_)) => {}
                None => panic!("animator went idle before the frame budget"),
            }
        }
        assert_eq!(completions, 1);
        assert!(animator.tick().is_none());
    }

    #[test]
    fn cancelled_run_never_completes() {
        let (from, to) = poses();
        let mut animator = FrameAnimator::new();
        animator.start(from, to, 10);

        for _ in 0..5 {
            assert!(matches!(animator.tick(), Some(AnimatorEvent::Pose(_))));
        }
        animator.cancel();
        assert!(!animator.is_animating());
        assert!(animator.tick().is_none());
    }

    #[test]
    fn eases_in_and_out() {
        let (from, to) = poses();
        let mut animator = FrameAnimator::new();
        animator.start(from, to, 100);

        let mut first_step = 0.0;
        let mut mid_step = 0.0;
        let mut last = from.position.x;
        for frame in 1..=99 {
            if let Some(AnimatorEvent::Pose(pose)) = animator.tick() {
                let step = pose.position.x - last;
                last = pose.position.x;
                if frame == 1 {
                    first_step = step;
                }
                if frame == 50 {
                    mid_step = step;
                }
            }
        }
        // Symmetric ease: slow at the start, fastest mid-flight
        assert!(mid_step > first_step * 2.0);
    }

    #[test]
    fn zero_frame_budget_completes_immediately() {
        let (from, to) = poses();
        let mut animator = FrameAnimator::new();
        animator.start(from, to, 0);
        assert!(matches!(
            animator.tick(),
            Some(AnimatorEvent::Completed(_))
        ));
    }
}
