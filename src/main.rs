//! Main module for the POH Roulette application using Yew.
//! Wires UI components, state hooks, and side-effect logic.

use log::{info, warn};
use poh_roulette::presets::{load_preset, save_preset, PresetError};
use poh_roulette::roster::lunch_items;
use poh_roulette::storage::BrowserStore;
use poh_roulette::{Item, Roster, SpinSettings, WheelControl};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::rc::Rc;
use yew::prelude::*;

mod audio;
mod components;
mod config;
mod hooks;
mod render;
mod utils;

use components::{ItemManager, LoadPresetModal, SavePresetModal, SettingsPanel, WheelCanvas, WheelHandle};
use config::*;
use hooks::{load_stored, use_notice, use_persisted};

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Run a preset operation against local storage, flattening errors to text.
fn with_browser_store<T>(
    op: impl FnOnce(&mut BrowserStore) -> Result<T, PresetError>,
) -> Result<T, String> {
    let mut store = BrowserStore::local().ok_or_else(|| "Local storage is unavailable".to_string())?;
    op(&mut store).map_err(|err| err.to_string())
}

/// Apply `change` to a copy of the roster and publish it.
fn update_roster(roster: &UseStateHandle<Roster>, change: impl FnOnce(&mut Roster)) {
    let mut next = (**roster).clone();
    change(&mut next);
    roster.set(next);
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    let roster = use_state(|| Roster::from_items(load_stored::<Vec<Item>>(ITEMS_KEY)));
    let settings = use_state(|| load_stored::<SpinSettings>(SETTINGS_KEY).clamped());
    let wheel = use_state(WheelHandle::default);
    // Second, independent generator blended into winner selection.
    let secondary_rng = use_mut_ref(SmallRng::from_os_rng);

    let is_spinning = use_state(|| false);
    let spin_token = use_state(|| 0u64);
    let winner = use_state(|| None::<usize>);
    let save_open = use_state(|| false);
    let load_open = use_state(|| false);
    let notice = use_notice(NOTICE_TIMEOUT_MS);

    use_persisted(ITEMS_KEY, roster.items().to_vec());
    use_persisted(SETTINGS_KEY, *settings);

    let items = Rc::new(roster.items().to_vec());

    // Keep the wheel's item count and duration in step with the UI.
    {
        let wheel = (*wheel).clone();
        use_effect_with((roster.len(), settings.duration_ms), move |&(count, duration_ms)| {
            wheel.configure(count, duration_ms);
            || ()
        });
    }

    let on_spin = {
        let roster = roster.clone();
        let settings = *settings;
        let wheel = (*wheel).clone();
        let secondary_rng = secondary_rng.clone();
        let is_spinning = is_spinning.clone();
        let spin_token = spin_token.clone();
        let winner = winner.clone();
        let show_notice = notice.show.clone();
        Callback::from(move |_: MouseEvent| {
            if *is_spinning {
                return;
            }

            let mut next = (*roster).clone();
            let picked = next.pick_winner(&mut rand::rng(), &mut *secondary_rng.borrow_mut());
            let target = match picked {
                Ok(index) => index,
                Err(err) => {
                    show_notice.emit(err.to_string());
                    return;
                }
            };

            let mut control = wheel.clone();
            control.configure(next.len(), settings.duration_ms);
            if let Err(err) = control.spin(target) {
                warn!("Spin not started: {}", err);
                return;
            }
            info!("Spinning towards '{}'", next.items()[target].name);

            roster.set(next);
            if settings.sound_enabled {
                audio::play_start_sound();
            }
            winner.set(None);
            is_spinning.set(true);
            spin_token.set(*spin_token + 1);
        })
    };

    let on_tick = {
        let sound_enabled = settings.sound_enabled;
        Callback::from(move |_: usize| {
            if sound_enabled {
                audio::play_tick_sound();
            }
        })
    };

    let on_finished = {
        let is_spinning = is_spinning.clone();
        let winner = winner.clone();
        Callback::from(move |index: usize| {
            is_spinning.set(false);
            winner.set(Some(index));
        })
    };

    let on_add = {
        let roster = roster.clone();
        Callback::from(move |name: String| {
            update_roster(&roster, |r| {
                r.add(&name, &mut rand::rng());
            });
        })
    };

    let on_remove = {
        let roster = roster.clone();
        let winner = winner.clone();
        Callback::from(move |id: String| {
            update_roster(&roster, |r| {
                r.remove(&id);
            });
            winner.set(None);
        })
    };

    let on_clear = {
        let roster = roster.clone();
        let winner = winner.clone();
        Callback::from(move |_: MouseEvent| {
            update_roster(&roster, Roster::clear);
            winner.set(None);
        })
    };

    let on_lunch_preset = {
        let roster = roster.clone();
        let winner = winner.clone();
        Callback::from(move |_: ()| {
            update_roster(&roster, |r| r.replace(lunch_items(&mut rand::rng())));
            winner.set(None);
        })
    };

    let on_settings = {
        let settings = settings.clone();
        Callback::from(move |next: SpinSettings| settings.set(next.clamped()))
    };

    let on_save_preset = {
        let items = items.clone();
        let show_notice = notice.show.clone();
        Callback::from(move |name: String| {
            match with_browser_store(|store| save_preset(store, &name, &items)) {
                Ok(saved) => show_notice.emit(format!("Preset \"{}\" saved", saved)),
                Err(msg) => show_notice.emit(msg),
            }
        })
    };

    let on_load_preset = {
        let roster = roster.clone();
        let winner = winner.clone();
        let show_notice = notice.show.clone();
        Callback::from(move |name: String| {
            // All or nothing: the current items stay if the preset is unreadable.
            match with_browser_store(|store| load_preset(&*store, &name)) {
                Ok(loaded) => {
                    update_roster(&roster, |r| r.replace(loaded));
                    winner.set(None);
                }
                Err(msg) => show_notice.emit(msg),
            }
        })
    };

    let open_save = {
        let save_open = save_open.clone();
        Callback::from(move |_: MouseEvent| save_open.set(true))
    };
    let open_load = {
        let load_open = load_open.clone();
        Callback::from(move |_: MouseEvent| load_open.set(true))
    };
    let close_save = {
        let save_open = save_open.clone();
        Callback::from(move |_: ()| save_open.set(false))
    };
    let close_load = {
        let load_open = load_open.clone();
        Callback::from(move |_: ()| load_open.set(false))
    };

    let winner_name = (*winner)
        .and_then(|index| roster.get(index))
        .map(|item| item.name.clone());

    html! {
        <div class="app">
            <aside class="sidebar">
                <div class="app-header">
                    <h1>{ "POH Roulette" }</h1>
                    <p class="subtitle">{ "Add items and spin the wheel to pick one at random" }</p>
                </div>

                <ItemManager
                    items={items.clone()}
                    disabled={*is_spinning}
                    {on_add}
                    {on_remove}
                />

                <div class="controls">
                    <button
                        class="btn btn-primary spin-button"
                        disabled={*is_spinning || roster.is_empty()}
                        onclick={on_spin}
                    >
                        { if *is_spinning { "Spinning..." } else { "Spin" } }
                    </button>
                    <div class="button-row">
                        <button class="btn btn-secondary" onclick={open_save}>{ "Save" }</button>
                        <button class="btn btn-secondary" disabled={*is_spinning} onclick={open_load}>
                            { "Load" }
                        </button>
                    </div>
                    <button class="btn btn-danger" disabled={*is_spinning} onclick={on_clear}>
                        { "Clear all" }
                    </button>
                </div>

                <SettingsPanel
                    settings={*settings}
                    disabled={*is_spinning}
                    on_change={on_settings}
                    {on_lunch_preset}
                />

                if let Some(ref message) = notice.message {
                    <div class="notice">{ message }</div>
                }
            </aside>

            <main class="stage">
                <WheelCanvas
                    wheel={(*wheel).clone()}
                    {items}
                    spin_token={*spin_token}
                    {on_tick}
                    {on_finished}
                />
                if let Some(name) = winner_name {
                    <div class="winner-banner">{ name }</div>
                }
            </main>

            <SavePresetModal open={*save_open} on_close={close_save} on_save={on_save_preset} />
            <LoadPresetModal open={*load_open} on_close={close_load} on_load={on_load_preset} />
        </div>
    }
}

/// Entry point: installs logging and the panic hook, then mounts the app.
fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    yew::Renderer::<App>::new().render();
}
