use gloo_timers::callback::Timeout;
use log::warn;
use poh_roulette::storage::{read_json_or, write_json, BrowserStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use yew::prelude::*;

/// Read a value saved under `key`, falling back to `T::default()` when the
/// key is missing, unreadable, or storage is unavailable.
pub fn load_stored<T>(key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match BrowserStore::local() {
        Some(store) => read_json_or(&store, key, T::default()),
        None => {
            warn!("Local storage unavailable, '{}' starts empty", key);
            T::default()
        }
    }
}

/// Write `value` to local storage under `key` every time it changes.
#[hook]
pub fn use_persisted<T>(key: &'static str, value: T)
where
    T: Serialize + PartialEq + 'static,
{
    use_effect_with(value, move |value| {
        if let Some(mut store) = BrowserStore::local() {
            if let Err(err) = write_json(&mut store, key, value) {
                warn!("Could not save '{}': {}", key, err);
            }
        }
        || ()
    });
}

/// A transient message shown to the user, cleared after a timeout.
#[derive(Clone, PartialEq)]
pub struct Notice {
    /// The message currently on screen, if any.
    pub message: Option<String>,
    /// Show a new message, replacing (and re-timing) any current one.
    pub show: Callback<String>,
}

#[hook]
pub fn use_notice(timeout_ms: u32) -> Notice {
    let message = use_state(|| None::<String>);
    // Dropping the previous Timeout cancels it.
    let timer = use_mut_ref(|| None::<Timeout>);

    let show = {
        let message = message.clone();
        Callback::from(move |text: String| {
            message.set(Some(text));
            let message = message.clone();
            *timer.borrow_mut() = Some(Timeout::new(timeout_ms, move || message.set(None)));
        })
    };

    Notice {
        message: (*message).clone(),
        show,
    }
}
