// This crate is the browser entry point of the dot grid

use showroom_helpers::CANVAS_SELECTOR;
use wasm_bindgen::prelude::*;
use web_sys::console;

pub(crate) fn main_wasm() -> Result<(), JsValue> {
    // Bevy takes over the canvas, check it is there before starting the app.
    let canvas = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.query_selector(CANVAS_SELECTOR).ok().flatten());
    if canvas.is_none() {
        return Err(JsValue::from_str(&format!(
            "No {CANVAS_SELECTOR} canvas on the page"
        )));
    }

    console::log_1(&format!("Starting dot grid on {CANVAS_SELECTOR}").into());
    dot_grid::run();
    Ok(())
}
