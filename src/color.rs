//! Colour model: pure functions producing 8-bit RGB frames.
//!
//! Every colour pushed to the strip during an animation can be recomputed
//! from these functions and the elapsed time, which is what the tests do.

use palette::Srgb;

/// Three 8-bit channels, the strip's native colour depth.
pub type Color = Srgb<u8>;

/// All channels dark.
pub const OFF: Color = Srgb::new(0, 0, 0);

/// The primary series: red, green, blue.
pub const SERIES: [Color; 3] = [
    Srgb::new(255, 0, 0),
    Srgb::new(0, 255, 0),
    Srgb::new(0, 0, 255),
];

/// Returns a colour with each channel sampled uniformly from `0..=255`.
pub fn random_color(rng: &mut fastrand::Rng) -> Color {
    Srgb::new(rng.u8(..), rng.u8(..), rng.u8(..))
}

/// Returns `palette[index]`, wrapping `index` around the palette length.
///
/// Returns `None` only for an empty palette.
pub fn indexed_color(index: usize, palette: &[Color]) -> Option<Color> {
    if palette.is_empty() {
        return None;
    }
    Some(palette[index % palette.len()])
}

/// Returns pure red, green or blue selected by `index % 3`.
#[inline]
pub fn primary_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}

/// Scales every channel by `ratio` (clamped to `0.0..=1.0`), rounding down.
pub fn scale_brightness(color: Color, ratio: f32) -> Color {
    let ratio = clamp_ratio(ratio);
    let scale = |c: u8| (f32::from(c) * ratio) as u8;
    Srgb::new(scale(color.red), scale(color.green), scale(color.blue))
}

/// Linear interpolation from `start` to `end`, rounding each channel to the
/// nearest integer.
///
/// `ratio` is clamped to `0.0..=1.0`. The endpoints are exact: a ratio of 0
/// yields `start` and a ratio of 1 yields `end`.
pub fn interpolate(start: Color, end: Color, ratio: f32) -> Color {
    let ratio = clamp_ratio(ratio);
    let mix = |a: u8, b: u8| {
        let a = f32::from(a);
        let value = a + (f32::from(b) - a) * ratio;
        (value + 0.5) as u8
    };
    Srgb::new(
        mix(start.red, end.red),
        mix(start.green, end.green),
        mix(start.blue, end.blue),
    )
}

/// Normalised progress through a fade, optionally inverted.
///
/// A zero-length fade is already complete: it yields 1.0, or 0.0 when inverted.
pub fn fade_ratio(elapsed_ms: u64, fade_ms: u64, inverted: bool) -> f32 {
    let ratio = if fade_ms == 0 || elapsed_ms >= fade_ms {
        1.0
    } else {
        elapsed_ms as f32 / fade_ms as f32
    };

    if inverted { 1.0 - ratio } else { ratio }
}

/// Packs a colour as `0x00RRGGBB`.
#[inline]
pub fn pack(color: Color) -> u32 {
    (u32::from(color.red) << 16) | (u32::from(color.green) << 8) | u32::from(color.blue)
}

/// Unpacks a `0x00RRGGBB` value. The top byte is ignored.
#[inline]
pub fn unpack(packed: u32) -> Color {
    Srgb::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

/// Where SetColor and CrossFade states take their colours from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMode {
    /// A fresh random colour every time.
    Random,

    /// Walk through a fixed palette, starting at `start`.
    Series {
        palette: &'static [Color],
        start: usize,
    },

    /// Cycle red, green, blue.
    PrimaryCycle,
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Series {
            palette: &SERIES,
            start: 0,
        }
    }
}

/// Stateful source of the next colour for the configured [`ColorMode`].
#[derive(Debug, Clone)]
pub struct ColorPicker {
    mode: ColorMode,
    index: usize,
    rng: fastrand::Rng,
    seed: u64,
}

impl ColorPicker {
    /// Creates a picker. `seed` only matters for [`ColorMode::Random`].
    pub fn new(mode: ColorMode, seed: u64) -> Self {
        Self {
            mode,
            index: Self::start_index(mode),
            rng: fastrand::Rng::with_seed(seed),
            seed,
        }
    }

    /// Returns the next colour and moves the series position forward.
    pub fn next_color(&mut self) -> Color {
        match self.mode {
            ColorMode::Random => random_color(&mut self.rng),
            ColorMode::Series { palette, .. } => {
                let color = indexed_color(self.index, palette).unwrap_or(OFF);
                self.index = (self.index + 1) % palette.len().max(1);
                color
            }
            ColorMode::PrimaryCycle => {
                let color = primary_color(self.index);
                self.index = (self.index + 1) % SERIES.len();
                color
            }
        }
    }

    /// Rewinds the series position and reseeds the RNG.
    pub fn reset(&mut self) {
        self.index = Self::start_index(self.mode);
        self.rng = fastrand::Rng::with_seed(self.seed);
    }

    /// Returns the configured mode.
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    fn start_index(mode: ColorMode) -> usize {
        match mode {
            ColorMode::Series { start, .. } => start,
            _ => 0,
        }
    }
}
