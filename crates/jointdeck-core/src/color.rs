//! Material color normalization.
//!
//! Robot description files and configuration hand the viewer colors in
//! several shapes: a whitespace-separated string, an `[r, g, b(, a)]` array,
//! an object with named or index-keyed channels, or nothing at all.
//! [`ColorSpec`] enumerates the accepted shapes and [`ColorSpec::resolve`]
//! collapses any of them to a packed RGB value with deterministic fallbacks.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

/// Packed 24-bit RGB color (`0xRRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Red channel, `0..=255`.
    #[must_use]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green channel, `0..=255`.
    #[must_use]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue channel, `0..=255`.
    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

/// Color applied when a visual carries no usable material color.
pub const DEFAULT_COLOR: Rgb = Rgb(0x00CC_CCCC);

/// Per-channel fallback for missing or unusable array/object channels.
///
/// Packs to `0xCC`, so a color object with no usable channels resolves to
/// the same value as [`DEFAULT_COLOR`] even though it takes a different
/// path through [`ColorSpec::resolve`].
const CHANNEL_FALLBACK: f32 = 0.8;

// ---------------------------------------------------------------------------
// ColorSpec
// ---------------------------------------------------------------------------

/// A material color in any of the accepted descriptor shapes.
///
/// Deserializes untagged, so configuration files may supply whichever shape
/// is convenient:
///
/// ```toml
/// ambient_color = "0.5 0.5 0.5 1.0"   # Text
/// ambient_color = [0.5, 0.5, 0.5]     # Channels
/// ambient_color = { r = 0.5, g = 0.5, b = 0.5 }  # Fields
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Whitespace-separated channel string, e.g. `"0.1 0.1 0.1 1.0"`.
    Text(String),
    /// Array form `[r, g, b]` or `[r, g, b, a]`.
    Channels(Vec<f32>),
    /// Object form with named channels, falling back to index-keyed ones.
    Fields(ColorFields),
    /// No color descriptor at all.
    #[default]
    Unspecified,
}

/// Channels of an object-shaped color.
///
/// A channel may appear under its name (`r`) or under its numeric index
/// (`"0"`); the named key wins when both are present and usable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ColorFields {
    #[serde(default)]
    pub r: Option<f32>,
    #[serde(default)]
    pub g: Option<f32>,
    #[serde(default)]
    pub b: Option<f32>,
    #[serde(default, rename = "0")]
    pub c0: Option<f32>,
    #[serde(default, rename = "1")]
    pub c1: Option<f32>,
    #[serde(default, rename = "2")]
    pub c2: Option<f32>,
}

impl ColorSpec {
    /// Collapse this descriptor to a packed RGB value.
    ///
    /// - [`Unspecified`](Self::Unspecified) yields [`DEFAULT_COLOR`].
    /// - [`Text`](Self::Text) keeps the finite numeric tokens; fewer than
    ///   three means the descriptor is unusable and yields
    ///   [`DEFAULT_COLOR`], otherwise the first three are packed.
    /// - [`Channels`](Self::Channels) and [`Fields`](Self::Fields) fill each
    ///   missing, zero, or NaN channel with `0.8` before packing.
    ///
    /// Channels are clamped to `0.0..=1.0` and packed linearly, so `0.8`
    /// becomes `0xCC`.
    #[must_use]
    pub fn resolve(&self) -> Rgb {
        match self {
            Self::Unspecified => DEFAULT_COLOR,
            Self::Text(text) => resolve_text(text),
            Self::Channels(channels) => pack(
                fill_channel(channels.first().copied()),
                fill_channel(channels.get(1).copied()),
                fill_channel(channels.get(2).copied()),
            ),
            Self::Fields(fields) => pack(
                pick_channel(fields.r, fields.c0),
                pick_channel(fields.g, fields.c1),
                pick_channel(fields.b, fields.c2),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution helpers
// ---------------------------------------------------------------------------

fn resolve_text(text: &str) -> Rgb {
    let channels: Vec<f32> = text
        .split_whitespace()
        .filter_map(|token| token.parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .collect();
    if channels.len() < 3 {
        return DEFAULT_COLOR;
    }
    pack(channels[0], channels[1], channels[2])
}

/// Whether a channel value counts as present. Zero and NaN do not, so they
/// fall through to the next candidate.
fn is_usable(value: f32) -> bool {
    value != 0.0 && !value.is_nan()
}

fn fill_channel(channel: Option<f32>) -> f32 {
    channel.filter(|v| is_usable(*v)).unwrap_or(CHANNEL_FALLBACK)
}

fn pick_channel(named: Option<f32>, indexed: Option<f32>) -> f32 {
    named
        .filter(|v| is_usable(*v))
        .or_else(|| indexed.filter(|v| is_usable(*v)))
        .unwrap_or(CHANNEL_FALLBACK)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pack(r: f32, g: f32, b: f32) -> Rgb {
    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    Rgb((to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
