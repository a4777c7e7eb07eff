mod app;
pub use app::*;

pub mod input;
pub mod theme;

mod window_resizing;
pub use window_resizing::MAX_SURFACE_DIMENSION;
