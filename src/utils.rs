use crate::config::{DURATION_STEP_MS, MAX_ITEM_NAME_LEN, MAX_PRESET_NAME_LEN};
use poh_roulette::defaults::{MAX_SPIN_DURATION_MS, MIN_SPIN_DURATION_MS};

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

/// Validate the spin duration slider value, snapped to the slider step.
pub fn validate_duration(input: &str) -> Result<u32, String> {
    let ms = validate_numeric_input(
        input,
        Some(MIN_SPIN_DURATION_MS),
        Some(MAX_SPIN_DURATION_MS),
        "Spin duration",
    )?;
    let snapped = (ms + DURATION_STEP_MS / 2) / DURATION_STEP_MS * DURATION_STEP_MS;
    Ok(snapped.min(MAX_SPIN_DURATION_MS))
}

fn validate_name(input: &str, max_len: usize, field_name: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("{} cannot exceed {} characters", field_name, max_len));
    }
    Ok(trimmed.to_string())
}

pub fn validate_item_name(input: &str) -> Result<String, String> {
    validate_name(input, MAX_ITEM_NAME_LEN, "Item name")
}

pub fn validate_preset_name(input: &str) -> Result<String, String> {
    validate_name(input, MAX_PRESET_NAME_LEN, "Preset name")
}

/// "4.5s" style label for a duration in milliseconds.
pub fn format_duration_secs(ms: u32) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}

/// Break a sector label into lines no wider than `max_width`.
///
/// `measure` returns the rendered width of a string. Words are never split;
/// a single word wider than the limit gets a line of its own.
pub fn wrap_label(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    if measure(text) <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };
        if measure(&candidate) > max_width && !line.is_empty() {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
