#[cfg(target_arch = "wasm32")]
mod main_wasm;

#[cfg(target_arch = "wasm32")]
fn main() -> Result<(), wasm_bindgen::prelude::JsValue> {
    main_wasm::main_wasm()
}

// Native builds open a window with the backdrop preset, handy for tuning
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    dot_grid::run();
}
