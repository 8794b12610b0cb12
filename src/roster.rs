//! The ordered item list together with the win history that indexes into it.

use crate::selector::{choose_winner, WinHistory};
use crate::{hsl_color, new_item_id, Item};
use log::{debug, info};
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinRequestError {
    NoItems,
}

impl fmt::Display for SpinRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinRequestError::NoItems => write!(f, "Add at least one item before spinning"),
        }
    }
}

impl std::error::Error for SpinRequestError {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    items: Vec<Item>,
    history: WinHistory,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            items,
            history: WinHistory::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn history(&self) -> &WinHistory {
        &self.history
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Append a new item. Blank names are ignored.
    pub fn add<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> Option<&Item> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let previous = self.items.len();
        self.items.push(Item::with_random_color(name, rng));
        self.history.sync_item_count(previous, self.items.len());
        self.items.last()
    }

    /// Remove the item with `id`, keeping the history aligned with the new order.
    pub fn remove(&mut self, id: &str) -> Option<Item> {
        let position = self.items.iter().position(|item| item.id == id)?;
        let previous = self.items.len();
        let removed = self.items.remove(position);
        self.history.forget_removed(position);
        self.history.sync_item_count(previous, self.items.len());
        debug!("Removed '{}' at index {}", removed.name, position);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.history.clear();
    }

    /// Swap in a whole new item set, e.g. from a preset. History starts over.
    pub fn replace(&mut self, items: Vec<Item>) {
        info!("Loaded {} items", items.len());
        self.items = items;
        self.history.clear();
    }

    /// Choose the next winner and remember it.
    pub fn pick_winner<P, S>(
        &mut self,
        primary: &mut P,
        secondary: &mut S,
    ) -> Result<usize, SpinRequestError>
    where
        P: Rng + ?Sized,
        S: Rng + ?Sized,
    {
        if self.items.is_empty() {
            return Err(SpinRequestError::NoItems);
        }
        let (index, history) = choose_winner(self.items.len(), &self.history, primary, secondary);
        self.history = history;
        Ok(index)
    }
}

/// Names and hues of the built-in lunch preset.
pub const LUNCH_PRESET: [(&str, f64); 4] = [
    ("Casimiro", 25.0),
    ("Xracing", 200.0),
    ("Paulo Vita", 120.0),
    ("Balela", 300.0),
];

pub fn lunch_items<R: Rng + ?Sized>(rng: &mut R) -> Vec<Item> {
    LUNCH_PRESET
        .iter()
        .map(|&(name, hue)| Item::new(new_item_id(rng), name, hsl_color(hue)))
        .collect()
}
