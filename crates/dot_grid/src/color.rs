//! Color parsing and theme color resolution.
//!
//! Theme tokens come in whatever form the design system wrote them: hex,
//! `rgb()`, `hsl()`, or the bare `H S% L%` triples stored in CSS custom
//! properties. Everything is normalised to an [`Rgb`] triple so the render pass
//! can interpolate channels. Nothing here fails: an unreadable value becomes
//! [`DEFAULT_COLOR`].

use bevy::prelude::*;
use thiserror::Error;

pub const DEFAULT_COLOR: Rgb = Rgb::new(0x52, 0x27, 0xff);
pub const DEFAULT_COLOR_CSS: &str = "#5227FF";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear interpolation, `t = 0` is `self` and `t = 1` is `other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let channel = |from: u8, to: u8| {
            let from = f32::from(from);
            let to = f32::from(to);
            (to - from).mul_add(t, from).round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_color(self) -> Color {
        Color::srgb_u8(self.r, self.g, self.b)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("empty color value")]
    Empty,

    #[error("invalid hex color {0:?}")]
    InvalidHex(String),

    #[error("invalid color component {0:?}")]
    InvalidComponent(String),

    #[error("unsupported color format {0:?}")]
    UnknownFormat(String),
}

pub fn parse_color(input: &str) -> Result<Rgb, ColorError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ColorError::Empty);
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    if let Some(inner) = function_arguments(&lower, &["rgb", "rgba"]) {
        return parse_rgb_arguments(inner);
    }
    if let Some(inner) = function_arguments(&lower, &["hsl", "hsla"]) {
        return parse_hsl_arguments(inner);
    }
    if lower.contains('%') {
        return parse_hsl_arguments(&lower);
    }

    Err(ColorError::UnknownFormat(value.to_owned()))
}

fn function_arguments<'a>(value: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        value
            .strip_prefix(name)
            .and_then(|rest| rest.trim_start().strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
    })
}

fn parse_hex(hex: &str) -> Result<Rgb, ColorError> {
    let invalid = || ColorError::InvalidHex(format!("#{hex}"));
    if !hex.chars().all(|digit| digit.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let digits = match hex.len() {
        6 => hex.to_owned(),
        // #rgb is shorthand for #rrggbb
        3 => hex.chars().flat_map(|digit| [digit, digit]).collect(),
        _ => return Err(invalid()),
    };

    let value = u32::from_str_radix(&digits, 16).ok().ok_or_else(invalid)?;
    Ok(Rgb::new(
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    ))
}

fn split_arguments(arguments: &str) -> Vec<&str> {
    arguments
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_rgb_arguments(arguments: &str) -> Result<Rgb, ColorError> {
    let parts = split_arguments(arguments);
    let [r, g, b, ..] = parts.as_slice() else {
        return Err(ColorError::InvalidComponent(arguments.to_owned()));
    };

    let channel = |part: &str| {
        part.parse::<f32>()
            .ok()
            .filter(|value| (0.0..=255.0).contains(value))
            .map(|value| value.round() as u8)
            .ok_or_else(|| ColorError::InvalidComponent(part.to_owned()))
    };
    Ok(Rgb::new(channel(r)?, channel(g)?, channel(b)?))
}

fn parse_hsl_arguments(arguments: &str) -> Result<Rgb, ColorError> {
    let parts = split_arguments(arguments);
    let [hue, saturation, lightness, ..] = parts.as_slice() else {
        return Err(ColorError::InvalidComponent(arguments.to_owned()));
    };

    let hue = hue
        .trim_end_matches("deg")
        .parse::<f32>()
        .ok()
        .filter(|hue| hue.is_finite())
        .ok_or_else(|| ColorError::InvalidComponent((*hue).to_owned()))?;
    let percent = |part: &str| {
        part.strip_suffix('%')
            .and_then(|number| number.parse::<f32>().ok())
            .filter(|value| (0.0..=100.0).contains(value))
            .map(|value| value / 100.0)
            .ok_or_else(|| ColorError::InvalidComponent(part.to_owned()))
    };

    Ok(hsl_to_rgb(hue, percent(saturation)?, percent(lightness)?))
}

/// HSL to RGB through chroma and hue segments.
///
/// `hue` is in degrees (any value, wrapped into `[0, 360)`), `saturation` and
/// `lightness` are fractions in `[0, 1]`.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let hue = hue.rem_euclid(360.0);
    let saturation = saturation.clamp(0.0, 1.0);
    let lightness = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - 2.0f32.mul_add(lightness, -1.0).abs()) * saturation;
    let x = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = lightness - chroma / 2.0;

    let (r, g, b) = match hue {
        h if h < 60.0 => (chroma, x, 0.0),
        h if h < 120.0 => (x, chroma, 0.0),
        h if h < 180.0 => (0.0, chroma, x),
        h if h < 240.0 => (0.0, x, chroma),
        h if h < 300.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let channel = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

/// A color in both its CSS form and as channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColor {
    pub css: String,
    pub rgb: Rgb,
}

impl ResolvedColor {
    pub fn fallback() -> Self {
        Self {
            css: DEFAULT_COLOR_CSS.to_owned(),
            rgb: DEFAULT_COLOR,
        }
    }
}

/// Explicit value first, then the theme token, then [`DEFAULT_COLOR`].
///
/// Non-hex inputs are normalised so `css` is always a hex string that matches `rgb`.
pub fn resolve_color(explicit: Option<&str>, variable: Option<&str>) -> ResolvedColor {
    let Some(raw) = explicit.or(variable) else {
        return ResolvedColor::fallback();
    };

    match parse_color(raw) {
        Ok(rgb) if raw.trim().starts_with('#') => ResolvedColor {
            css: raw.trim().to_owned(),
            rgb,
        },
        Ok(rgb) => ResolvedColor {
            css: rgb.to_hex(),
            rgb,
        },
        Err(err) => {
            tracing::debug!("falling back to {DEFAULT_COLOR_CSS}: {err}");
            ResolvedColor::fallback()
        }
    }
}

/// Resting and highlight colors of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub rest: ResolvedColor,
    pub highlight: ResolvedColor,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            rest: ResolvedColor::fallback(),
            highlight: ResolvedColor::fallback(),
        }
    }
}

impl ThemeColors {
    /// Resolves both colors, `lookup` maps a theme token name to its raw value.
    pub fn resolve(
        rest_color: Option<&str>,
        rest_variable: &str,
        highlight_color: Option<&str>,
        highlight_variable: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        // Tokens are only read when there is no explicit override.
        let rest_token = rest_color.is_none().then(|| lookup(rest_variable)).flatten();
        let highlight_token = highlight_color
            .is_none()
            .then(|| lookup(highlight_variable))
            .flatten();

        Self {
            rest: resolve_color(rest_color, rest_token.as_deref()),
            highlight: resolve_color(highlight_color, highlight_token.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::hex("#d33682", Rgb::new(0xd3, 0x36, 0x82))]
    #[case::upper_hex("#5227FF", Rgb::new(0x52, 0x27, 0xff))]
    #[case::short_hex("#fff", Rgb::new(255, 255, 255))]
    #[case::rgb("rgb(12, 34, 56)", Rgb::new(12, 34, 56))]
    #[case::rgb_space("rgb(12 34 56 / 0.5)", Rgb::new(12, 34, 56))]
    #[case::hsl_red("hsl(0, 100%, 50%)", Rgb::new(255, 0, 0))]
    #[case::css_triple("0 100% 50%", Rgb::new(255, 0, 0))]
    #[case::css_triple_green("120 100% 25%", Rgb::new(0, 128, 0))]
    #[case::hsl_deg("hsl(240deg 100% 50%)", Rgb::new(0, 0, 255))]
    #[case::padded("  #000000 ", Rgb::new(0, 0, 0))]
    fn parses_supported_formats(#[case] input: &str, #[case] expected: Rgb) {
        assert_eq!(parse_color(input), Ok(expected), "parsing {input}");
    }

    #[rstest]
    #[case::empty("")]
    #[case::bad_hex("#12345")]
    #[case::not_hex("#zzzzzz")]
    #[case::named("rebeccapurple")]
    #[case::out_of_range("rgb(300, 0, 0)")]
    #[case::missing_percent("hsl(10, 20, 30)")]
    #[case::too_few("rgb(1, 2)")]
    fn rejects_garbage(#[case] input: &str) {
        assert!(parse_color(input).is_err(), "{input} should not parse");
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb::new(255, 0, 0), "red");
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb::new(0, 255, 0), "green");
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Rgb::new(0, 0, 255), "blue");
        assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), Rgb::new(255, 0, 0), "hue wraps");
        assert_eq!(hsl_to_rgb(42.0, 0.0, 1.0), Rgb::new(255, 255, 255), "white");
        assert_eq!(hsl_to_rgb(42.0, 0.7, 0.0), Rgb::new(0, 0, 0), "black");
    }

    #[test]
    fn lerp_hits_both_ends_exactly() {
        let rest = Rgb::new(10, 200, 30);
        let highlight = Rgb::new(250, 0, 128);
        assert_eq!(rest.lerp(highlight, 0.0), rest, "t = 0");
        assert_eq!(rest.lerp(highlight, 1.0), highlight, "t = 1");
        assert_eq!(rest.lerp(highlight, 0.5), Rgb::new(130, 100, 79), "halfway");
    }

    #[test]
    fn resolution_prefers_explicit_then_token_then_default() {
        let explicit = resolve_color(Some("#010203"), Some("#ffffff"));
        assert_eq!(explicit.rgb, Rgb::new(1, 2, 3), "explicit wins");

        let token = resolve_color(None, Some("331 74% 49%"));
        assert_eq!(token.css, token.rgb.to_hex(), "token normalised to hex");

        assert_eq!(resolve_color(None, None), ResolvedColor::fallback(), "nothing given");
        assert_eq!(
            resolve_color(Some("not a color"), None),
            ResolvedColor::fallback(),
            "unparseable"
        );
    }

    #[test]
    fn theme_colors_skip_lookup_for_overrides() {
        let colors = ThemeColors::resolve(Some("#000000"), "--primary", None, "--accent", |name| {
            assert_eq!(name, "--accent", "only the highlight token is read");
            Some("#ffffff".to_owned())
        });
        assert_eq!(colors.rest.rgb, Rgb::new(0, 0, 0), "rest override");
        assert_eq!(colors.highlight.rgb, Rgb::new(255, 255, 255), "highlight token");
    }
}
