//! Frame-driven spin animation.
//!
//! [`SpinAnimator`] owns the wheel angle. A spin is planned up front from the
//! target index ([`SpinPlan`]); each display frame then calls
//! [`SpinAnimator::step`] with the frame timestamp and gets back the angle to
//! draw plus an optional tick. The final frame lands exactly on
//! [`SpinPlan::final_angle`], which always maps back to the target through
//! [`winner_at`].

use crate::geometry::{rotation_to, slice_center, slice_width, winner_at};
use log::{debug, warn};
use rand::Rng;
use std::fmt;

/// Stop point spread inside the target slice, as a fraction of its width.
const SLICE_OFFSET_FRACTION: f64 = 0.35;
const MIN_EXTRA_TURNS: f64 = 3.0;
const EXTRA_TURN_SPREAD: f64 = 4.0;

/// Past this progress the easing is jitter-free.
pub const JITTER_CUTOFF: f64 = 0.85;
const JITTER_SCALE: f64 = 0.008;
const JITTER_FALLOFF: f64 = 0.8;

const TICK_WINDOW_START: f64 = 0.1;
const TICK_WINDOW_END: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    NoItems,
    TargetOutOfRange { target: usize, item_count: usize },
}

impl fmt::Display for SpinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinError::NoItems => write!(f, "Cannot spin a wheel without items"),
            SpinError::TargetOutOfRange { target, item_count } => write!(
                f,
                "Target index {} is outside a wheel of {} items",
                target, item_count
            ),
        }
    }
}

impl std::error::Error for SpinError {}

/// Cubic ease-out: fast start, gentle stop.
#[inline]
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Eased progress with a small mechanical wobble before [`JITTER_CUTOFF`].
///
/// `sample` is a uniform draw in `[0, 1)`; its influence shrinks linearly to
/// zero at the cutoff and the result is always inside `[0, 1]`.
pub fn eased_progress(progress: f64, sample: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    let eased = ease_out_cubic(progress);
    if progress >= JITTER_CUTOFF {
        return eased;
    }
    let strength = (JITTER_CUTOFF - progress) * JITTER_FALLOFF;
    (eased + (sample - 0.5) * JITTER_SCALE * strength).clamp(0.0, 1.0)
}

/// Everything needed to replay one spin deterministically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub target_index: usize,
    pub item_count: usize,
    pub start_angle: f64,
    /// Forward rotation added over the whole spin, extra turns included.
    pub total_rotation: f64,
    pub duration_ms: f64,
}

impl SpinPlan {
    pub fn new<R: Rng + ?Sized>(
        target_index: usize,
        item_count: usize,
        start_angle: f64,
        duration_ms: u32,
        rng: &mut R,
    ) -> Result<Self, SpinError> {
        if item_count == 0 {
            return Err(SpinError::NoItems);
        }
        if target_index >= item_count {
            return Err(SpinError::TargetOutOfRange {
                target: target_index,
                item_count,
            });
        }

        let offset = rng.random_range(-SLICE_OFFSET_FRACTION..=SLICE_OFFSET_FRACTION)
            * slice_width(item_count);
        let landing = slice_center(target_index, item_count) + offset;

        // Whole turns only, so the extra spinning never moves the stop point.
        let turn_draw: f64 = rng.random();
        let turn_fraction: f64 = rng.random();
        let full_turns =
            (MIN_EXTRA_TURNS + turn_draw * EXTRA_TURN_SPREAD + turn_fraction).floor() as u32;

        Ok(Self {
            target_index,
            item_count,
            start_angle,
            total_rotation: rotation_to(start_angle, landing, full_turns),
            duration_ms: f64::from(duration_ms),
        })
    }

    pub fn final_angle(&self) -> f64 {
        self.start_angle + self.total_rotation
    }

    /// Progress in `[0, 1]` after `elapsed_ms`.
    pub fn progress_at(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn angle_at(&self, eased: f64) -> f64 {
        self.start_angle + self.total_rotation * eased
    }
}

/// Output of one animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub angle: f64,
    pub progress: f64,
    /// Item that just arrived under the pointer, if this frame crossed a boundary.
    pub tick: Option<usize>,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveSpin {
    plan: SpinPlan,
    started_at: Option<f64>,
    last_tick: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Running(ActiveSpin),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinAnimator {
    angle: f64,
    phase: Phase,
}

impl Default for SpinAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinAnimator {
    pub fn new() -> Self {
        Self::with_angle(0.0)
    }

    pub fn with_angle(angle: f64) -> Self {
        Self {
            angle,
            phase: Phase::Idle,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn plan(&self) -> Option<&SpinPlan> {
        match &self.phase {
            Phase::Running(spin) => Some(&spin.plan),
            Phase::Idle => None,
        }
    }

    /// Start a spin from the current angle.
    ///
    /// The clock starts at the first [`step`](Self::step). On error nothing
    /// changes and no frame should be scheduled.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        target_index: usize,
        item_count: usize,
        duration_ms: u32,
        rng: &mut R,
    ) -> Result<SpinPlan, SpinError> {
        let plan = match SpinPlan::new(target_index, item_count, self.angle, duration_ms, rng) {
            Ok(plan) => plan,
            Err(err) => {
                warn!("Spin request ignored: {}", err);
                return Err(err);
            }
        };
        debug!(
            "Spinning to index {}/{}: {:.3} rad over {} ms",
            target_index, item_count, plan.total_rotation, duration_ms
        );
        self.phase = Phase::Running(ActiveSpin {
            plan,
            started_at: None,
            last_tick: None,
        });
        Ok(plan)
    }

    /// Advance to the frame at `now_ms`. Returns `None` while idle.
    pub fn step<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> Option<Frame> {
        let Phase::Running(spin) = &mut self.phase else {
            return None;
        };

        let started_at = *spin.started_at.get_or_insert(now_ms);
        let progress = spin.plan.progress_at(now_ms - started_at);
        let angle = spin.plan.angle_at(eased_progress(progress, rng.random()));

        let mut tick = None;
        if progress > TICK_WINDOW_START && progress < TICK_WINDOW_END {
            let at_pointer = winner_at(angle, spin.plan.item_count);
            if spin.last_tick != Some(at_pointer) {
                spin.last_tick = Some(at_pointer);
                tick = Some(at_pointer);
            }
        }

        let finished = progress >= 1.0;
        if finished {
            debug!(
                "Spin finished at {:.4} rad on index {}",
                angle,
                winner_at(angle, spin.plan.item_count)
            );
            self.phase = Phase::Idle;
        }
        self.angle = angle;

        Some(Frame {
            angle,
            progress,
            tick,
            finished,
        })
    }

    /// Stop a running spin where it is. Returns whether a spin was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.is_running();
        self.phase = Phase::Idle;
        was_running
    }

    pub fn current_winner(&self, item_count: usize) -> usize {
        winner_at(self.angle, item_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::TAU;

    #[test]
    fn final_angle_maps_to_target() {
        for seed in 0..300 {
            let mut rng = StdRng::seed_from_u64(seed);
            let item_count = 1 + (seed as usize % 17);
            let start = (seed as f64 - 150.0) * 1.37;
            for target in 0..item_count {
                let plan = SpinPlan::new(target, item_count, start, 3000, &mut rng).unwrap();
                assert_eq!(winner_at(plan.final_angle(), item_count), target);
            }
        }
    }

    #[test]
    fn plan_adds_three_to_seven_turns() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let plan = SpinPlan::new(1, 6, 0.4, 4000, &mut rng).unwrap();
            assert!(plan.total_rotation >= 3.0 * TAU);
            assert!(plan.total_rotation < 8.0 * TAU);
        }
    }

    #[test]
    fn plan_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(SpinPlan::new(0, 0, 0.0, 3000, &mut rng), Err(SpinError::NoItems));
        assert_eq!(
            SpinPlan::new(4, 4, 0.0, 3000, &mut rng),
            Err(SpinError::TargetOutOfRange { target: 4, item_count: 4 })
        );
    }

    #[test]
    fn easing_settles_without_jitter() {
        let mut previous = eased_progress(JITTER_CUTOFF, 0.9);
        let mut progress = JITTER_CUTOFF;
        while progress < 1.0 {
            progress = (progress + 0.001).min(1.0);
            for sample in [0.0, 0.5, 0.999] {
                let eased = eased_progress(progress, sample);
                assert_eq!(eased, ease_out_cubic(progress));
                assert!(eased >= previous);
            }
            previous = eased_progress(progress, 0.0);
        }
        assert_eq!(eased_progress(1.0, 0.123), 1.0);
    }

    #[test]
    fn jitter_stays_small_and_bounded() {
        for step in 0..=100 {
            let progress = step as f64 / 100.0;
            for sample in [0.0, 0.25, 0.75, 0.999_999] {
                let eased = eased_progress(progress, sample);
                assert!((0.0..=1.0).contains(&eased));
                assert!((eased - ease_out_cubic(progress)).abs() <= 0.004);
            }
        }
    }

    #[test]
    fn zero_items_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut animator = SpinAnimator::with_angle(1.5);
        assert_eq!(animator.start(0, 0, 3000, &mut rng), Err(SpinError::NoItems));
        assert!(!animator.is_running());
        assert_eq!(animator.step(10.0, &mut rng), None);
        assert_eq!(animator.angle(), 1.5);
    }

    #[test]
    fn spin_runs_to_completion_and_keeps_angle() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut animator = SpinAnimator::new();
        let plan = animator.start(3, 8, 2000, &mut rng).unwrap();

        let mut now = 1_000.0;
        let mut last = None;
        while let Some(frame) = animator.step(now, &mut rng) {
            last = Some(frame);
            if frame.finished {
                break;
            }
            now += 16.0;
        }
        let last = last.unwrap();
        assert!(last.finished);
        assert_eq!(last.angle, plan.final_angle());
        assert!(!animator.is_running());
        assert_eq!(animator.current_winner(8), 3);

        // The next spin starts where this one stopped.
        let next = animator.start(5, 8, 2000, &mut rng).unwrap();
        assert_eq!(next.start_angle, plan.final_angle());
        assert_eq!(animator.current_winner(8), 3);
    }

    #[test]
    fn ticks_only_inside_window_and_on_change() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut animator = SpinAnimator::new();
        animator.start(0, 12, 5000, &mut rng).unwrap();

        let mut now = 0.0;
        let mut previous_tick = None;
        let mut ticks = 0;
        while let Some(frame) = animator.step(now, &mut rng) {
            if let Some(index) = frame.tick {
                assert!(frame.progress > 0.1 && frame.progress < 0.9);
                assert_ne!(Some(index), previous_tick);
                assert_eq!(index, winner_at(frame.angle, 12));
                previous_tick = Some(index);
                ticks += 1;
            }
            if frame.finished {
                break;
            }
            now += 16.0;
        }
        assert!(ticks > 12, "only {} ticks", ticks);
    }

    #[test]
    fn cancel_leaves_angle_in_place() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut animator = SpinAnimator::new();
        animator.start(1, 3, 3000, &mut rng).unwrap();
        animator.step(0.0, &mut rng);
        let frame = animator.step(500.0, &mut rng).unwrap();
        assert!(animator.cancel());
        assert_eq!(animator.angle(), frame.angle);
        assert!(!animator.cancel());
        assert_eq!(animator.step(600.0, &mut rng), None);
    }
}
