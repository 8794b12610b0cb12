//! Canvas drawing for the wheel. Pure presentation: everything drawn is a
//! function of the item list and the current angle.
//!
//! The canvas is rotated clockwise by the wheel angle and slice `i` is laid
//! out counter-clockwise from the pointer, so the sector under the pointer is
//! always `winner_at(angle, items.len())`.

use crate::config::{
    LABEL_LINE_HEIGHT, LABEL_MAX_WIDTH, WHEEL_HUB_RADIUS, WHEEL_RIM_MARGIN,
};
use crate::utils::wrap_label;
use poh_roulette::geometry::slice_width;
use poh_roulette::Item;
use std::f64::consts::{FRAC_PI_2, TAU};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const EMPTY_WHEEL_FILL: &str = "#374151";
const EMPTY_WHEEL_STROKE: &str = "#6b7280";
const EMPTY_WHEEL_TEXT: &str = "#9ca3af";
const SECTOR_BORDER: &str = "rgba(0, 0, 0, 0.3)";
const HUB_FILL: &str = "rgba(0, 0, 0, 0.8)";

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Match the backing store to the element's CSS size and the device pixel ratio.
pub fn fit_to_display(canvas: &HtmlCanvasElement) {
    let dpr = gloo_utils::window().device_pixel_ratio().max(1.0);
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }
    canvas.set_width((rect.width() * dpr).round() as u32);
    canvas.set_height((rect.height() * dpr).round() as u32);
}

/// Redraw the whole wheel at `angle`.
pub fn draw_wheel(canvas: &HtmlCanvasElement, items: &[Item], angle: f64) -> Result<(), JsValue> {
    let ctx = context_2d(canvas)?;
    let dpr = gloo_utils::window().device_pixel_ratio().max(1.0);
    let width = canvas.width() as f64 / dpr;
    let height = canvas.height() as f64 / dpr;

    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, width, height);

    let center_x = width / 2.0;
    let center_y = height / 2.0;
    let radius = (center_x.min(center_y) - WHEEL_RIM_MARGIN).max(0.0);

    if items.is_empty() {
        return draw_empty(&ctx, center_x, center_y, radius);
    }

    ctx.save();
    ctx.translate(center_x, center_y)?;
    ctx.rotate(angle)?;

    let sweep = slice_width(items.len());
    for (index, item) in items.iter().enumerate() {
        // Canvas angles are measured from 3 o'clock; the pointer is at 12.
        let end = -FRAC_PI_2 - index as f64 * sweep;
        let start = end - sweep;
        draw_sector(&ctx, item, radius, start, end)?;
    }

    ctx.restore();
    draw_hub(&ctx, center_x, center_y)
}

fn draw_sector(
    ctx: &CanvasRenderingContext2d,
    item: &Item,
    radius: f64,
    start: f64,
    end: f64,
) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.move_to(0.0, 0.0);
    ctx.arc(0.0, 0.0, radius, start, end)?;
    ctx.close_path();
    ctx.set_fill_style_str(&item.color);
    ctx.fill();
    ctx.set_stroke_style_str(SECTOR_BORDER);
    ctx.set_line_width(2.0);
    ctx.stroke();

    ctx.save();
    ctx.rotate((start + end) / 2.0)?;
    ctx.translate(radius * 0.65, 0.0)?;
    ctx.rotate(FRAC_PI_2)?;
    ctx.set_fill_style_str("white");
    ctx.set_font("bold 18px Inter");
    ctx.set_text_align("center");
    ctx.set_shadow_color("rgba(0, 0, 0, 0.5)");
    ctx.set_shadow_blur(4.0);

    let lines = wrap_label(&item.name, LABEL_MAX_WIDTH, |text| {
        ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
    });
    let mut y = if lines.len() > 1 { -LABEL_LINE_HEIGHT / 2.0 } else { 0.0 };
    for line in &lines {
        ctx.fill_text(line, 0.0, y)?;
        y += LABEL_LINE_HEIGHT;
    }

    ctx.restore();
    Ok(())
}

fn draw_empty(
    ctx: &CanvasRenderingContext2d,
    center_x: f64,
    center_y: f64,
    radius: f64,
) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(center_x, center_y, radius, 0.0, TAU)?;
    ctx.set_fill_style_str(EMPTY_WHEEL_FILL);
    ctx.fill();
    ctx.set_stroke_style_str(EMPTY_WHEEL_STROKE);
    ctx.set_line_width(3.0);
    ctx.stroke();

    ctx.set_fill_style_str(EMPTY_WHEEL_TEXT);
    ctx.set_font("18px Inter");
    ctx.set_text_align("center");
    ctx.fill_text("Add some items", center_x, center_y)
}

fn draw_hub(ctx: &CanvasRenderingContext2d, center_x: f64, center_y: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(center_x, center_y, WHEEL_HUB_RADIUS, 0.0, TAU)?;
    ctx.set_fill_style_str(HUB_FILL);
    ctx.fill();
    ctx.set_stroke_style_str(EMPTY_WHEEL_STROKE);
    ctx.set_line_width(4.0);
    ctx.stroke();
    Ok(())
}
