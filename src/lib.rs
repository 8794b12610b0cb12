use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod animator;
pub mod geometry;
pub mod presets;
pub mod roster;
pub mod selector;
pub mod storage;
pub mod wheel;

pub use animator::{Frame, SpinAnimator, SpinError, SpinPlan};
pub use geometry::winner_at;
pub use roster::{Roster, SpinRequestError};
pub use selector::{choose_winner, WinHistory};
pub use wheel::{Wheel, WheelControl};

/// Default tunables shared by the selector, the animator and the settings panel.
pub mod defaults {
    pub const SPIN_DURATION_MS: u32 = 4500;
    pub const MIN_SPIN_DURATION_MS: u32 = 2000;
    pub const MAX_SPIN_DURATION_MS: u32 = 8000;
    pub const SOUND_ENABLED: bool = true;

    /// Number of past winners remembered by the anti-repeat policy.
    pub const HISTORY_LEN: usize = 2;
    /// Below this many items the win history carries no useful information.
    pub const MIN_ITEMS_FOR_HISTORY: usize = 3;
    pub const MAX_SELECTION_ATTEMPTS: usize = 50;
}

/// One entry on the wheel. Order inside the roster defines sector order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// Build an item with a fresh random id and a random hue.
    pub fn with_random_color<R: Rng + ?Sized>(name: impl Into<String>, rng: &mut R) -> Self {
        let hue: f64 = rng.random_range(0.0..360.0);
        Self::new(new_item_id(rng), name, hsl_color(hue))
    }
}

/// UUID-formatted identifier built from the given random source.
pub fn new_item_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    uuid::Builder::from_random_bytes(rng.random())
        .into_uuid()
        .to_string()
}

/// CSS colour used for wheel sectors; saturation and lightness are fixed.
pub fn hsl_color(hue: f64) -> String {
    format!("hsl({:.0} 75% 55%)", hue.rem_euclid(360.0))
}

/// Per-spin settings supplied by the settings panel.
///
/// Field names on the wire stay `speed` / `soundEnabled` so settings saved by
/// earlier builds of the page still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinSettings {
    #[serde(rename = "speed")]
    pub duration_ms: u32,
    #[serde(rename = "soundEnabled")]
    pub sound_enabled: bool,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            duration_ms: defaults::SPIN_DURATION_MS,
            sound_enabled: defaults::SOUND_ENABLED,
        }
    }
}

impl SpinSettings {
    /// Copy of these settings with the duration forced into the allowed range.
    pub fn clamped(self) -> Self {
        Self {
            duration_ms: clamp_duration_ms(self.duration_ms),
            ..self
        }
    }
}

#[inline]
pub fn clamp_duration_ms(duration_ms: u32) -> u32 {
    duration_ms.clamp(defaults::MIN_SPIN_DURATION_MS, defaults::MAX_SPIN_DURATION_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn settings_use_legacy_field_names() {
        let json = serde_json::to_string(&SpinSettings::default()).unwrap();
        assert_eq!(json, r#"{"speed":4500,"soundEnabled":true}"#);

        let parsed: SpinSettings =
            serde_json::from_str(r#"{"speed":2500,"soundEnabled":false}"#).unwrap();
        assert_eq!(parsed.duration_ms, 2500);
        assert!(!parsed.sound_enabled);
    }

    #[test]
    fn clamped_settings_stay_in_range() {
        let slow = SpinSettings { duration_ms: 60_000, sound_enabled: true }.clamped();
        assert_eq!(slow.duration_ms, defaults::MAX_SPIN_DURATION_MS);
        let fast = SpinSettings { duration_ms: 10, sound_enabled: false }.clamped();
        assert_eq!(fast.duration_ms, defaults::MIN_SPIN_DURATION_MS);
        assert!(!fast.sound_enabled);
    }

    #[test]
    fn random_items_get_distinct_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = Item::with_random_color("Ana", &mut rng);
        let b = Item::with_random_color("Ana", &mut rng);
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36);
        assert!(a.color.starts_with("hsl("));
        assert!(a.color.ends_with(" 75% 55%)"));
    }

    #[test]
    fn hsl_color_wraps_hue() {
        assert_eq!(hsl_color(25.0), "hsl(25 75% 55%)");
        assert_eq!(hsl_color(365.0), "hsl(5 75% 55%)");
    }
}
