//! Web Audio cues for spins.
//!
//! A single `AudioContext` is created lazily and kept in a thread-local so
//! every tick reuses it. Failures are logged and otherwise ignored: a missing
//! sound must never interrupt a spin.

use log::error;
use std::cell::RefCell;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

thread_local! {
    /// Shared audio context, created on first use.
    static AUDIO_CONTEXT: RefCell<Option<AudioContext>> = const { RefCell::new(None) };
}

fn with_context<F>(play: F)
where
    F: FnOnce(&AudioContext) -> Result<(), JsValue>,
{
    AUDIO_CONTEXT.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            match AudioContext::new() {
                Ok(ctx) => *slot = Some(ctx),
                Err(err) => {
                    error!("Error creating audio context: {:?}", err);
                    return;
                }
            }
        }
        if let Some(ctx) = slot.as_ref() {
            if let Err(err) = play(ctx) {
                error!("Error playing sound: {:?}", err);
            }
        }
    });
}

/// Rising sawtooth sweep played when a spin starts.
pub fn play_start_sound() {
    with_context(|ctx| {
        let now = ctx.current_time();
        let oscillator = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;

        oscillator.set_type(OscillatorType::Sawtooth);
        oscillator.frequency().set_value(220.0);
        oscillator.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        gain.gain().set_value_at_time(0.0, now)?;
        gain.gain().linear_ramp_to_value_at_time(0.12, now + 0.02)?;
        oscillator
            .frequency()
            .exponential_ramp_to_value_at_time(900.0, now + 0.45)?;
        gain.gain().exponential_ramp_to_value_at_time(0.001, now + 1.2)?;

        oscillator.start()?;
        oscillator.stop_with_when(now + 1.25)?;
        Ok(())
    });
}

/// Short square click for a sector crossing the pointer.
pub fn play_tick_sound() {
    with_context(|ctx| {
        let oscillator = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;

        oscillator.set_type(OscillatorType::Square);
        oscillator.frequency().set_value(1200.0);
        gain.gain().set_value(0.08);

        oscillator.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        oscillator.start()?;
        oscillator.stop_with_when(ctx.current_time() + 0.03)?;
        Ok(())
    });
}
