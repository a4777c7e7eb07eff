/// Largest surface extent the GL / WebGPU backends accept on every device we target.
///
/// Both the browser window and any texture drawn into it are clamped to this.
pub const MAX_SURFACE_DIMENSION: u32 = 2048;

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    mut primary_query: bevy::ecs::system::Query<
        &mut bevy::window::Window,
        bevy::ecs::query::With<bevy::window::PrimaryWindow>,
    >,
) {
    let Some(wasm_window) = web_sys::window() else {
        return;
    };
    let Ok(inner_width) = wasm_window.inner_width() else {
        return;
    };
    let Ok(inner_height) = wasm_window.inner_height() else {
        return;
    };
    let Some(target_width) = inner_width.as_f64() else {
        return;
    };
    let Some(target_height) = inner_height.as_f64() else {
        return;
    };
    let max = MAX_SURFACE_DIMENSION as f32;
    let target_width = (target_width as f32).min(max);
    let target_height = (target_height as f32).min(max);

    for mut window in &mut primary_query {
        // `Surface` width and height must be within the maximum supported texture size.
        if (window.resolution.width() - target_width).abs() > f32::EPSILON
            || (window.resolution.height() - target_height).abs() > f32::EPSILON
        {
            bevy::log::debug!("browser resized to {target_width}x{target_height}");
            window.resolution.set(target_width, target_height);
        }
    }
}
