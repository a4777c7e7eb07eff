use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;
use showroom_helpers::theme::{ActiveTheme, ThemeChanged, ThemeMode, theme_variable};

use crate::canvas::RasterCanvas;
use crate::color::{ThemeColors, parse_color};
use crate::engine::{Capability, DotGrid};
use crate::settings::DotGridSettings;

/// Theme token painted behind the grid.
const BACKGROUND_VARIABLE: &str = "--background";

/// The running grid and the pixels it paints into. Absent when the grid is unsupported.
#[derive(Resource)]
pub struct DotGridState {
    pub grid: DotGrid,
    pub canvas: RasterCanvas,
}

impl DotGridState {
    pub fn new(grid: DotGrid) -> Self {
        Self {
            grid,
            canvas: RasterCanvas::new(),
        }
    }
}

/// Texture the canvas is uploaded into.
#[derive(Resource, Deref, DerefMut)]
pub struct DotSurface(Handle<Image>);

#[derive(Component)]
pub struct DotGridSprite;

pub fn theme_colors(settings: &DotGridSettings, mode: ThemeMode) -> ThemeColors {
    ThemeColors::resolve(
        settings.rest_color.as_deref(),
        &settings.rest_variable,
        settings.highlight_color.as_deref(),
        &settings.highlight_variable,
        |name| theme_variable(mode, name),
    )
}

pub(crate) fn setup_dot_grid(
    mut commands: Commands,
    settings: Res<DotGridSettings>,
    theme: Res<ActiveTheme>,
    mut images: ResMut<Assets<Image>>,
) {
    let colors = theme_colors(&settings, theme.0);
    let grid = match DotGrid::probe(settings.clone(), colors) {
        Capability::Supported(grid) => grid,
        Capability::Unsupported(err) => {
            warn!("Dot grid disabled: {err}");
            return;
        }
    };

    // Placeholder until the first window size is known
    let image = Image::new_fill(
        Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    let handle = images.add(image);

    commands.spawn((
        Name::new("DotGrid"),
        Sprite {
            image: handle.clone(),
            custom_size: Some(Vec2::ONE),
            ..default()
        },
        Transform::default(),
        DotGridSprite,
    ));
    commands.insert_resource(DotSurface(handle));
    commands.insert_resource(DotGridState::new(grid));
}

/// Rebuilds the grid whenever the primary window changes size or scale factor.
pub(crate) fn fit_to_window(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut state: ResMut<DotGridState>,
    mut sprites: Query<&mut Sprite, With<DotGridSprite>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    let scale_factor = window.scale_factor();

    let DotGridState { grid, canvas } = &mut *state;
    if grid.lattice().size().abs_diff_eq(size, f32::EPSILON)
        && (canvas.device_scale_factor() - scale_factor).abs() < f32::EPSILON
    {
        return;
    }

    if grid.resize(size, scale_factor, canvas) {
        for mut sprite in &mut sprites {
            sprite.custom_size = Some(size);
        }
    }
}

pub(crate) fn refresh_theme_colors(
    mut changes: EventReader<ThemeChanged>,
    settings: Res<DotGridSettings>,
    mut state: ResMut<DotGridState>,
    mut clear_color: ResMut<ClearColor>,
) {
    let Some(ThemeChanged(mode)) = changes.read().last().copied() else {
        return;
    };

    let colors = theme_colors(&settings, mode);
    debug!(
        "{mode} theme: dots {} highlight {}",
        colors.rest.css, colors.highlight.css
    );
    state.grid.set_colors(colors);

    if let Some(background) =
        theme_variable(mode, BACKGROUND_VARIABLE).and_then(|value| parse_color(&value).ok())
    {
        clear_color.0 = background.to_color();
    }
}

pub(crate) fn paint_dots(
    mut state: ResMut<DotGridState>,
    surface: Res<DotSurface>,
    mut images: ResMut<Assets<Image>>,
) {
    let DotGridState { grid, canvas } = &mut *state;
    let size = canvas.physical_size();
    if size.x == 0 || size.y == 0 {
        return;
    }
    grid.render(canvas);

    let Some(image) = images.get_mut(&**surface) else {
        return;
    };
    // Whole-buffer upload every frame, 16 MB at the surface limit. The
    // vector keeps its capacity so only resizes allocate.
    image.texture_descriptor.size = Extent3d {
        width: size.x,
        height: size.y,
        depth_or_array_layers: 1,
    };
    image.data.clear();
    image.data.extend_from_slice(canvas.as_bytes());
}
