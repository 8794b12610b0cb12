//! Yew view components for the roulette UI.
//!
//! Everything here is presentation and input handling; the selection and
//! animation logic lives in the library crate.

use crate::render;
use crate::utils::{format_duration_secs, validate_duration, validate_item_name, validate_preset_name};
use gloo_render::{request_animation_frame, AnimationFrame};
use log::{error, warn};
use poh_roulette::defaults::{MAX_SPIN_DURATION_MS, MIN_SPIN_DURATION_MS};
use poh_roulette::presets::{delete_preset, list_presets};
use poh_roulette::storage::BrowserStore;
use poh_roulette::{Frame, Item, SpinError, SpinSettings, Wheel, WheelControl};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{HtmlCanvasElement, HtmlInputElement};
use yew::prelude::*;

use crate::config::{DURATION_STEP_MS, WHEEL_CANVAS_SIZE};

/// Shared handle to the one wheel on the page. Equality is identity.
#[derive(Clone, Default)]
pub struct WheelHandle(Rc<RefCell<Wheel>>);

impl PartialEq for WheelHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl WheelHandle {
    pub fn angle(&self) -> f64 {
        self.0.borrow().angle()
    }

    pub fn advance(&self, now_ms: f64) -> Option<Frame> {
        self.0.borrow_mut().advance(now_ms)
    }

    pub fn cancel(&self) -> bool {
        self.0.borrow_mut().cancel()
    }

    pub fn configure(&self, item_count: usize, duration_ms: u32) {
        let mut wheel = self.0.borrow_mut();
        wheel.set_item_count(item_count);
        wheel.set_duration_ms(duration_ms);
    }
}

impl WheelControl for WheelHandle {
    fn spin(&mut self, target_index: usize) -> Result<(), SpinError> {
        self.0.borrow_mut().spin(target_index)
    }

    fn current_winner(&self) -> usize {
        self.0.borrow().current_winner()
    }
}

fn redraw(canvas: &NodeRef, items: &[Item], angle: f64) {
    if let Some(canvas) = canvas.cast::<HtmlCanvasElement>() {
        if let Err(err) = render::draw_wheel(&canvas, items, angle) {
            error!("Failed to draw wheel: {:?}", err);
        }
    }
}

/// State captured by one spin's chain of animation frames.
struct FrameLoop {
    wheel: WheelHandle,
    canvas: NodeRef,
    items: Rc<Vec<Item>>,
    on_tick: Callback<usize>,
    on_finished: Callback<usize>,
    pending: Rc<RefCell<Option<AnimationFrame>>>,
}

fn schedule_frame(frame_loop: Rc<FrameLoop>) {
    let this = Rc::clone(&frame_loop);
    let handle = request_animation_frame(move |timestamp| {
        this.pending.borrow_mut().take();
        let Some(frame) = this.wheel.advance(timestamp) else {
            return;
        };
        if let Some(index) = frame.tick {
            this.on_tick.emit(index);
        }
        redraw(&this.canvas, &this.items, frame.angle);
        if frame.finished {
            this.on_finished.emit(this.wheel.current_winner());
        } else {
            schedule_frame(this);
        }
    });
    *frame_loop.pending.borrow_mut() = Some(handle);
}

#[derive(Properties, PartialEq)]
pub struct WheelCanvasProps {
    pub wheel: WheelHandle,
    pub items: Rc<Vec<Item>>,
    /// Bumped by the parent after each successful `spin`; starts the frame loop.
    pub spin_token: u64,
    pub on_tick: Callback<usize>,
    pub on_finished: Callback<usize>,
}

#[function_component(WheelCanvas)]
pub fn wheel_canvas(props: &WheelCanvasProps) -> Html {
    let canvas_ref = use_node_ref();
    let pending = use_mut_ref(|| None::<AnimationFrame>);

    // Redraw at rest whenever the item list changes.
    {
        let canvas_ref = canvas_ref.clone();
        let wheel = props.wheel.clone();
        use_effect_with(props.items.clone(), move |items| {
            if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                render::fit_to_display(&canvas);
            }
            redraw(&canvas_ref, items, wheel.angle());
            || ()
        });
    }

    {
        let frame_loop = FrameLoop {
            wheel: props.wheel.clone(),
            canvas: canvas_ref.clone(),
            items: props.items.clone(),
            on_tick: props.on_tick.clone(),
            on_finished: props.on_finished.clone(),
            pending: pending.clone(),
        };
        use_effect_with(props.spin_token, move |&token| {
            if token > 0 {
                schedule_frame(Rc::new(frame_loop));
            }
            || ()
        });
    }

    // No frame may fire after teardown.
    {
        let pending = pending.clone();
        let wheel = props.wheel.clone();
        use_effect_with((), move |_| {
            move || {
                pending.borrow_mut().take();
                if wheel.cancel() {
                    warn!("Wheel removed mid-spin, animation cancelled");
                }
            }
        });
    }

    html! {
        <div class="wheel-container">
            <canvas
                ref={canvas_ref}
                class="wheel-canvas"
                width={WHEEL_CANVAS_SIZE.to_string()}
                height={WHEEL_CANVAS_SIZE.to_string()}
            />
            <div class="wheel-pointer">{ "▼" }</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ItemManagerProps {
    pub items: Rc<Vec<Item>>,
    pub disabled: bool,
    pub on_add: Callback<String>,
    pub on_remove: Callback<String>,
}

#[function_component(ItemManager)]
pub fn item_manager(props: &ItemManagerProps) -> Html {
    let text = use_state(String::new);
    let error = use_state(|| None::<String>);

    let oninput = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(input.value());
        })
    };

    let onsubmit = {
        let text = text.clone();
        let error = error.clone();
        let on_add = props.on_add.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match validate_item_name(&text) {
                Ok(name) => {
                    on_add.emit(name);
                    text.set(String::new());
                    error.set(None);
                }
                Err(msg) => error.set(Some(msg)),
            }
        })
    };

    html! {
        <div class="item-manager">
            <h3>{ format!("Items ({})", props.items.len()) }</h3>
            <form class="item-form" {onsubmit}>
                <input
                    type="text"
                    placeholder="Add an item..."
                    value={(*text).clone()}
                    disabled={props.disabled}
                    {oninput}
                />
                <button type="submit" class="btn btn-primary" disabled={props.disabled}>
                    { "Add" }
                </button>
            </form>
            if let Some(ref err) = *error {
                <div class="input-error">{ err }</div>
            }
            if props.items.is_empty() {
                <p class="empty-list">{ "No items yet" }</p>
            } else {
                <ul class="item-list">
                    { for props.items.iter().map(|item| {
                        let id = item.id.clone();
                        let on_remove = props.on_remove.clone();
                        html! {
                            <li key={item.id.clone()} class="item-row">
                                <span class="item-swatch" style={format!("background: {}", item.color)}></span>
                                <span class="item-name">{ item.name.clone() }</span>
                                <button
                                    class="btn-icon"
                                    title="Remove"
                                    disabled={props.disabled}
                                    onclick={Callback::from(move |_: MouseEvent| on_remove.emit(id.clone()))}
                                >
                                    { "✕" }
                                </button>
                            </li>
                        }
                    }) }
                </ul>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SettingsPanelProps {
    pub settings: SpinSettings,
    pub disabled: bool,
    pub on_change: Callback<SpinSettings>,
    pub on_lunch_preset: Callback<()>,
}

#[function_component(SettingsPanel)]
pub fn settings_panel(props: &SettingsPanelProps) -> Html {
    let on_duration = {
        let settings = props.settings;
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match validate_duration(&input.value()) {
                Ok(duration_ms) => on_change.emit(SpinSettings {
                    duration_ms,
                    ..settings
                }),
                Err(msg) => warn!("{}", msg),
            }
        })
    };

    let on_sound = {
        let settings = props.settings;
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_change.emit(SpinSettings {
                sound_enabled: input.checked(),
                ..settings
            });
        })
    };

    let on_lunch = props.on_lunch_preset.reform(|_: MouseEvent| ());

    html! {
        <div class="settings-panel">
            <h3>{ "Settings" }</h3>
            <div class="form-group">
                <label for="spin-duration">{ "Spin duration" }</label>
                <input
                    type="range"
                    id="spin-duration"
                    min={MIN_SPIN_DURATION_MS.to_string()}
                    max={MAX_SPIN_DURATION_MS.to_string()}
                    step={DURATION_STEP_MS.to_string()}
                    value={props.settings.duration_ms.to_string()}
                    oninput={on_duration}
                />
                <div class="slider-labels">
                    <span>{ "Fast" }</span>
                    <span class="slider-value">{ format_duration_secs(props.settings.duration_ms) }</span>
                    <span>{ "Slow" }</span>
                </div>
            </div>
            <div class="form-group checkbox-group">
                <label>
                    <input type="checkbox" checked={props.settings.sound_enabled} onchange={on_sound} />
                    { "Sound enabled" }
                </label>
            </div>
            <button class="btn btn-secondary" disabled={props.disabled} onclick={on_lunch}>
                { "🍽️ Lunch time" }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SavePresetModalProps {
    pub open: bool,
    pub on_close: Callback<()>,
    pub on_save: Callback<String>,
}

#[function_component(SavePresetModal)]
pub fn save_preset_modal(props: &SavePresetModalProps) -> Html {
    let name = use_state(String::new);
    let error = use_state(|| None::<String>);

    let close = {
        let name = name.clone();
        let error = error.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            name.set(String::new());
            error.set(None);
            on_close.emit(());
        })
    };

    let oninput = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };

    let onsubmit = {
        let name = name.clone();
        let error = error.clone();
        let on_save = props.on_save.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match validate_preset_name(&name) {
                Ok(valid) => {
                    on_save.emit(valid);
                    name.set(String::new());
                    error.set(None);
                    on_close.emit(());
                }
                Err(msg) => error.set(Some(msg)),
            }
        })
    };

    if !props.open {
        return html! {};
    }

    html! {
        <div class="modal">
            <div class="modal-backdrop" onclick={close.clone()}></div>
            <div class="modal-card">
                <div class="modal-header">
                    <h3>{ "Save preset" }</h3>
                    <button class="btn-icon" onclick={close.clone()}>{ "✕" }</button>
                </div>
                <form {onsubmit}>
                    <label for="preset-name">{ "Preset name" }</label>
                    <input
                        type="text"
                        id="preset-name"
                        placeholder="Type a name for the preset..."
                        value={(*name).clone()}
                        {oninput}
                    />
                    if let Some(ref err) = *error {
                        <div class="input-error">{ err }</div>
                    }
                    <div class="modal-actions">
                        <button type="button" class="btn btn-secondary" onclick={close}>{ "Cancel" }</button>
                        <button type="submit" class="btn btn-primary" disabled={name.trim().is_empty()}>
                            { "Save" }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

fn stored_preset_names() -> Result<Vec<String>, String> {
    let store = BrowserStore::local().ok_or("Local storage is unavailable")?;
    list_presets(&store).map_err(|err| err.to_string())
}

#[derive(Properties, PartialEq)]
pub struct LoadPresetModalProps {
    pub open: bool,
    pub on_close: Callback<()>,
    pub on_load: Callback<String>,
}

#[function_component(LoadPresetModal)]
pub fn load_preset_modal(props: &LoadPresetModalProps) -> Html {
    let presets = use_state(Vec::<String>::new);
    let selected = use_state(|| None::<String>);
    let error = use_state(|| None::<String>);

    // Re-read the preset list every time the modal opens.
    {
        let presets = presets.clone();
        let selected = selected.clone();
        let error = error.clone();
        use_effect_with(props.open, move |&open| {
            if open {
                match stored_preset_names() {
                    Ok(names) => {
                        presets.set(names);
                        error.set(None);
                    }
                    Err(msg) => error.set(Some(msg)),
                }
                selected.set(None);
            }
            || ()
        });
    }

    let close = props.on_close.reform(|_: MouseEvent| ());

    let on_load = {
        let selected = selected.clone();
        let on_load = props.on_load.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(name) = (*selected).clone() {
                on_load.emit(name);
                on_close.emit(());
            }
        })
    };

    let on_delete = {
        let presets = presets.clone();
        let selected = selected.clone();
        let error = error.clone();
        Callback::from(move |name: String| {
            let confirmed = gloo_utils::window()
                .confirm_with_message(&format!("Delete the preset \"{}\"?", name))
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let result = BrowserStore::local()
                .ok_or_else(|| "Local storage is unavailable".to_string())
                .and_then(|mut store| delete_preset(&mut store, &name).map_err(|err| err.to_string()))
                .and_then(|_| stored_preset_names());
            match result {
                Ok(names) => presets.set(names),
                Err(msg) => error.set(Some(msg)),
            }
            if selected.as_deref() == Some(name.as_str()) {
                selected.set(None);
            }
        })
    };

    if !props.open {
        return html! {};
    }

    html! {
        <div class="modal">
            <div class="modal-backdrop" onclick={close.clone()}></div>
            <div class="modal-card">
                <div class="modal-header">
                    <h3>{ "Load preset" }</h3>
                    <button class="btn-icon" onclick={close.clone()}>{ "✕" }</button>
                </div>
                if let Some(ref err) = *error {
                    <div class="input-error">{ err }</div>
                }
                if presets.is_empty() {
                    <p class="empty-list">{ "No saved presets" }</p>
                } else {
                    <label>{ "Available presets" }</label>
                    <ul class="preset-list">
                        { for presets.iter().map(|preset| {
                            let is_selected = selected.as_deref() == Some(preset.as_str());
                            let select = {
                                let selected = selected.clone();
                                let preset = preset.clone();
                                Callback::from(move |_: MouseEvent| selected.set(Some(preset.clone())))
                            };
                            let delete = {
                                let on_delete = on_delete.clone();
                                let preset = preset.clone();
                                Callback::from(move |e: MouseEvent| {
                                    e.stop_propagation();
                                    on_delete.emit(preset.clone());
                                })
                            };
                            html! {
                                <li
                                    key={preset.clone()}
                                    class={classes!("preset-row", is_selected.then_some("selected"))}
                                    onclick={select}
                                >
                                    <span class="preset-name">{ preset.clone() }</span>
                                    <button class="btn-icon" title="Delete preset" onclick={delete}>{ "🗑" }</button>
                                </li>
                            }
                        }) }
                    </ul>
                }
                <div class="modal-actions">
                    <button class="btn btn-secondary" onclick={close}>{ "Cancel" }</button>
                    <button class="btn btn-primary" disabled={selected.is_none()} onclick={on_load}>
                        { "Load" }
                    </button>
                </div>
            </div>
        </div>
    }
}
