//! Output collaborators: the addressable strip and its adapter to `smart-leds`.
//!
//! The UV light needs no trait of its own; any
//! [`embedded_hal::digital::OutputPin`] drives it.

use crate::color::{Color, OFF};
use smart_leds::{RGB8, SmartLedsWrite, brightness};

/// Trait for abstracting an addressable LED strip.
///
/// Implement this for your strip hardware. `fill` only touches the frame
/// buffer; nothing reaches the LEDs until `show` is called. Handle any
/// hardware errors internally - these methods cannot fail.
pub trait StripDriver {
    /// Returns the number of LEDs on the strip.
    fn len(&self) -> usize;

    /// Sets `count` LEDs starting at `offset` to `color` in the frame buffer.
    ///
    /// LEDs past the end of the strip are ignored.
    fn fill(&mut self, color: Color, offset: usize, count: usize);

    /// Pushes the frame buffer to the physical strip.
    fn show(&mut self);

    /// Sets whole-strip brightness (0-255), applied on the next `show`.
    fn set_brightness(&mut self, level: u8);

    /// Blanks every LED and pushes the result.
    fn clear(&mut self) {
        let len = self.len();
        self.fill(OFF, 0, len);
        self.show();
    }
}

/// Frame-buffered [`StripDriver`] over any `smart-leds` writer.
///
/// # Type Parameters
/// * `W` - The WS2812 (or compatible) writer
/// * `N` - Number of LEDs on the strip
pub struct SmartLedStrip<W, const N: usize> {
    writer: W,
    pixels: [RGB8; N],
    brightness: u8,
}

impl<W, const N: usize> SmartLedStrip<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<RGB8>,
{
    /// Wraps a writer. All pixels start dark at full brightness.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pixels: [RGB8::default(); N],
            brightness: u8::MAX,
        }
    }

    /// Returns the frame buffer as last filled.
    pub fn pixels(&self) -> &[RGB8; N] {
        &self.pixels
    }

    /// Returns the configured brightness.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Releases the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W, const N: usize> StripDriver for SmartLedStrip<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<RGB8>,
{
    fn len(&self) -> usize {
        N
    }

    fn fill(&mut self, color: Color, offset: usize, count: usize) {
        let end = offset.saturating_add(count).min(N);
        if offset >= end {
            return;
        }
        let pixel = RGB8::new(color.red, color.green, color.blue);
        self.pixels[offset..end].fill(pixel);
    }

    fn show(&mut self) {
        let frame = brightness(self.pixels.iter().copied(), self.brightness);
        if self.writer.write(frame).is_err() {
            warn!("strip write failed, frame dropped");
        }
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }
}
