//! The wheel as seen by the rest of the app.
//!
//! [`WheelControl`] is the only surface callers need: start a spin towards an
//! index and ask which item is under the pointer. [`Wheel`] implements it on
//! top of a [`SpinAnimator`], remembering the current item count and spin
//! duration so callers don't have to thread them through every call.

use crate::animator::{Frame, SpinAnimator, SpinError};
use crate::{clamp_duration_ms, defaults};
use rand::rngs::ThreadRng;
use rand::Rng;

pub trait WheelControl {
    /// Begin animating towards `target_index`. No-op error on an empty wheel.
    fn spin(&mut self, target_index: usize) -> Result<(), SpinError>;

    /// Item currently under the pointer.
    fn current_winner(&self) -> usize;
}

#[derive(Debug)]
pub struct Wheel<R = ThreadRng> {
    animator: SpinAnimator,
    item_count: usize,
    duration_ms: u32,
    rng: R,
}

impl Wheel<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl Default for Wheel<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Wheel<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            animator: SpinAnimator::new(),
            item_count: 0,
            duration_ms: defaults::SPIN_DURATION_MS,
            rng,
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Takes effect for the next spin; a running spin keeps its own count.
    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn set_duration_ms(&mut self, duration_ms: u32) {
        self.duration_ms = clamp_duration_ms(duration_ms);
    }

    pub fn angle(&self) -> f64 {
        self.animator.angle()
    }

    pub fn is_spinning(&self) -> bool {
        self.animator.is_running()
    }

    /// Step the animation to the frame timestamp `now_ms`.
    pub fn advance(&mut self, now_ms: f64) -> Option<Frame> {
        self.animator.step(now_ms, &mut self.rng)
    }

    pub fn cancel(&mut self) -> bool {
        self.animator.cancel()
    }
}

impl<R: Rng> WheelControl for Wheel<R> {
    fn spin(&mut self, target_index: usize) -> Result<(), SpinError> {
        self.animator
            .start(target_index, self.item_count, self.duration_ms, &mut self.rng)
            .map(|_| ())
    }

    fn current_winner(&self) -> usize {
        self.animator.current_winner(self.item_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run_to_end<R: Rng>(wheel: &mut Wheel<R>) -> Frame {
        let mut now = 0.0;
        loop {
            let frame = wheel.advance(now).expect("wheel should be spinning");
            if frame.finished {
                return frame;
            }
            now += 16.7;
        }
    }

    #[test]
    fn spins_land_on_requested_items() {
        let mut wheel = Wheel::with_rng(StdRng::seed_from_u64(99));
        wheel.set_item_count(7);
        wheel.set_duration_ms(2000);
        for target in [3, 3, 0, 6, 1] {
            wheel.spin(target).unwrap();
            assert!(wheel.is_spinning());
            run_to_end(&mut wheel);
            assert_eq!(wheel.current_winner(), target);
        }
    }

    #[test]
    fn empty_wheel_refuses_to_spin() {
        let mut wheel = Wheel::with_rng(StdRng::seed_from_u64(1));
        assert_eq!(wheel.spin(0), Err(SpinError::NoItems));
        assert!(!wheel.is_spinning());
        assert_eq!(wheel.advance(0.0), None);
        assert_eq!(wheel.current_winner(), 0);
    }

    #[test]
    fn duration_is_clamped() {
        let mut wheel = Wheel::with_rng(StdRng::seed_from_u64(1));
        wheel.set_duration_ms(100);
        assert_eq!(wheel.duration_ms(), defaults::MIN_SPIN_DURATION_MS);
        wheel.set_duration_ms(20_000);
        assert_eq!(wheel.duration_ms(), defaults::MAX_SPIN_DURATION_MS);
    }
}
