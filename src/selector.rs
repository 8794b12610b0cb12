//! Winner selection with a short anti-repeat memory.
//!
//! The selector is a pure function of the item count, the rolling history of
//! recent winners and two random sources. The caller decides where the
//! history lives and hands the updated copy back on the next spin.
//!
//! # Policy
//! - 0 or 1 items: index 0, history untouched.
//! - 2 items: strict alternation with the last recorded winner.
//! - 3+ items: uniform draw, re-drawn while it repeats one of the last two
//!   winners, at most [`MAX_SELECTION_ATTEMPTS`] draws.

use crate::defaults::{HISTORY_LEN, MAX_SELECTION_ATTEMPTS, MIN_ITEMS_FOR_HISTORY};
use log::{debug, info};
use rand::Rng;

/// The most recent winning indices, oldest first. Never longer than [`HISTORY_LEN`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinHistory {
    recent: Vec<usize>,
}

impl WinHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from raw indices, keeping only the newest entries.
    pub fn from_indices(indices: &[usize]) -> Self {
        let mut history = Self::new();
        for &index in indices {
            history.record(index);
        }
        history
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn last(&self) -> Option<usize> {
        self.recent.last().copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.recent.contains(&index)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.recent
    }

    /// Append a winner and drop everything but the newest [`HISTORY_LEN`] entries.
    pub fn record(&mut self, index: usize) {
        self.recent.push(index);
        if self.recent.len() > HISTORY_LEN {
            let excess = self.recent.len() - HISTORY_LEN;
            self.recent.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }

    /// Keep the history pointing at the same items after `removed` left the list.
    pub fn forget_removed(&mut self, removed: usize) {
        self.recent.retain(|&index| index != removed);
        for index in &mut self.recent {
            if *index > removed {
                *index -= 1;
            }
        }
    }

    /// React to the item count changing from `previous` to `current`.
    ///
    /// Entering or leaving the "fewer than three items" regime wipes the
    /// history; any stale index outside the new range is dropped as well.
    pub fn sync_item_count(&mut self, previous: usize, current: usize) {
        if previous != current
            && (current < MIN_ITEMS_FOR_HISTORY || previous < MIN_ITEMS_FOR_HISTORY)
        {
            debug!(
                "Item count changed {} -> {}, clearing win history",
                previous, current
            );
            self.recent.clear();
            return;
        }
        self.recent.retain(|&index| index < current);
    }
}

/// Pick the next winner and return it with the updated history.
///
/// `primary` should be a cryptographically strong generator; `secondary` an
/// independent one whose output is blended in. `item_count == 0` is a caller
/// error: the result is index 0 with the history unchanged.
pub fn choose_winner<P, S>(
    item_count: usize,
    history: &WinHistory,
    primary: &mut P,
    secondary: &mut S,
) -> (usize, WinHistory)
where
    P: Rng + ?Sized,
    S: Rng + ?Sized,
{
    if item_count <= 1 {
        return (0, history.clone());
    }

    let index = if item_count == 2 {
        match history.last() {
            Some(0) => 1,
            Some(_) => 0,
            None => 1,
        }
    } else {
        draw_avoiding_history(item_count, history, primary, secondary)
    };

    let mut updated = history.clone();
    updated.record(index);
    debug!(
        "Selected index {} of {} (history {:?} -> {:?})",
        index,
        item_count,
        history.as_slice(),
        updated.as_slice()
    );
    (index, updated)
}

fn draw_avoiding_history<P, S>(
    item_count: usize,
    history: &WinHistory,
    primary: &mut P,
    secondary: &mut S,
) -> usize
where
    P: Rng + ?Sized,
    S: Rng + ?Sized,
{
    // Only insist on variety once the history is "full" for this item count.
    let enough_history = history.len() >= HISTORY_LEN.min(item_count - 1);

    let mut candidate = blended_index(item_count, primary, secondary);
    let mut attempts = 1;
    while enough_history && history.contains(candidate) {
        if attempts >= MAX_SELECTION_ATTEMPTS {
            info!(
                "Gave up avoiding recent winners after {} draws, accepting index {}",
                attempts, candidate
            );
            break;
        }
        candidate = blended_index(item_count, primary, secondary);
        attempts += 1;
    }
    candidate
}

/// Uniform index in `0..item_count` built from both random sources.
///
/// The two unit draws are added modulo 1, which stays uniform as long as
/// either source is.
pub fn blended_index<P, S>(item_count: usize, primary: &mut P, secondary: &mut S) -> usize
where
    P: Rng + ?Sized,
    S: Rng + ?Sized,
{
    let strong: f64 = primary.random();
    let weak: f64 = secondary.random();
    let combined = (strong + weak).fract();
    ((combined * item_count as f64) as usize).min(item_count.saturating_sub(1))
}
