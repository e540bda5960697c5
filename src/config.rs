//! Compiled-in configuration, validated once at startup.
//!
//! Build a [`Config`] with [`Config::builder`]. Every check that could
//! otherwise fail mid-animation (empty sequences, an exhaustible sequence
//! list, an empty palette) runs in [`ConfigBuilder::build`].

use crate::color::{ColorMode, ColorPicker};
use crate::schedule::{ScheduleGate, ScheduleWindow};
use crate::sequence::{Sequence, SequenceEngine};
use crate::types::{ConfigError, State};
use heapless::Vec;

/// Default hold duration in milliseconds.
pub const DEFAULT_HOLD_MS: u32 = 2000;

/// Default fade duration in milliseconds.
pub const DEFAULT_FADE_MS: u32 = 500;

/// Default number of LEDs on the strip.
pub const DEFAULT_LED_COUNT: usize = 20;

/// Default delay between boot-time connection attempts.
pub const DEFAULT_RETRY_BACKOFF_MS: u32 = 5000;

const COLOR_CYCLE: &[State] = &[State::SetColor, State::FadeIn, State::Hold, State::FadeOut];
const UV_FLASH: &[State] = &[State::UvOn, State::UvOff];

/// Three fade cycles through the colour mode, then one UV flash.
pub const DEFAULT_SEQUENCES: [Sequence; 2] = [
    Sequence::new(COLOR_CYCLE, 3, false),
    Sequence::new(UV_FLASH, 1, false),
];

/// Strip geometry and whole-strip brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripConfig {
    /// Number of LEDs driven, counted from the start of the strip.
    pub led_count: usize,
    /// Brightness applied once at start.
    pub brightness: u8,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            led_count: DEFAULT_LED_COUNT,
            brightness: u8::MAX,
        }
    }
}

/// Daily on/off window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleConfig {
    /// When false the sequencer animates around the clock and no time sync runs.
    pub enabled: bool,
    /// Time span during which animation is allowed.
    pub window: ScheduleWindow,
}

/// Validated runtime configuration.
///
/// # Type Parameters
/// * `S` - Maximum number of sequences
#[derive(Debug, Clone)]
pub struct Config<const S: usize> {
    hold_ms: u32,
    fade_ms: u32,
    color_mode: ColorMode,
    sequences: Vec<Sequence, S>,
    strip: StripConfig,
    schedule: ScheduleConfig,
    utc_offset_secs: i32,
    rng_seed: u64,
    retry_backoff_ms: u32,
    warnings: usize,
}

impl<const S: usize> Config<S> {
    /// Creates a builder with default timing and colours and no sequences.
    pub fn builder() -> ConfigBuilder<S> {
        ConfigBuilder::new()
    }

    /// Hold duration in milliseconds.
    pub fn hold_ms(&self) -> u32 {
        self.hold_ms
    }

    /// Fade duration in milliseconds.
    pub fn fade_ms(&self) -> u32 {
        self.fade_ms
    }

    /// Where SetColor and CrossFade states take their colours from.
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// The configured sequences in playback order.
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Strip geometry and brightness.
    pub fn strip(&self) -> StripConfig {
        self.strip
    }

    /// Daily schedule settings.
    pub fn schedule(&self) -> ScheduleConfig {
        self.schedule
    }

    /// Offset added to UTC epoch seconds to get local time.
    pub fn utc_offset_secs(&self) -> i32 {
        self.utc_offset_secs
    }

    /// Seed for random colour mode.
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Fixed delay between boot-time connection attempts.
    pub fn retry_backoff_ms(&self) -> u32 {
        self.retry_backoff_ms
    }

    /// Number of validation warnings raised while building.
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// Creates an engine over the configured sequence list.
    pub fn engine(&self) -> SequenceEngine<S> {
        SequenceEngine::new(self.sequences.clone())
    }

    /// Creates a colour picker for the configured mode.
    pub fn color_picker(&self) -> ColorPicker {
        ColorPicker::new(self.color_mode, self.rng_seed)
    }

    /// Creates a schedule gate, or one that never pauses if the schedule is off.
    pub fn schedule_gate(&self) -> ScheduleGate {
        if self.schedule.enabled {
            ScheduleGate::new(self.schedule.window)
        } else {
            ScheduleGate::always_active()
        }
    }

    /// Converts UTC epoch seconds to local epoch seconds.
    pub fn local_epoch(&self, utc_secs: u64) -> u64 {
        let local = i128::from(utc_secs) + i128::from(self.utc_offset_secs);
        u64::try_from(local.max(0)).unwrap_or(u64::MAX)
    }
}

/// Builder for constructing a validated [`Config`].
#[derive(Debug)]
pub struct ConfigBuilder<const S: usize> {
    hold_ms: u32,
    fade_ms: u32,
    color_mode: ColorMode,
    sequences: Vec<Sequence, S>,
    strip: StripConfig,
    schedule: ScheduleConfig,
    utc_offset_secs: i32,
    rng_seed: u64,
    retry_backoff_ms: u32,
}

impl<const S: usize> ConfigBuilder<S> {
    /// Creates a builder with default timing and colours and no sequences.
    pub fn new() -> Self {
        Self {
            hold_ms: DEFAULT_HOLD_MS,
            fade_ms: DEFAULT_FADE_MS,
            color_mode: ColorMode::default(),
            sequences: Vec::new(),
            strip: StripConfig::default(),
            schedule: ScheduleConfig::default(),
            utc_offset_secs: 0,
            rng_seed: 0,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }

    /// Sets the hold duration. Zero makes Hold and UvOff complete immediately.
    pub fn hold_ms(mut self, hold_ms: u32) -> Self {
        self.hold_ms = hold_ms;
        self
    }

    /// Sets the fade duration. Zero makes fades complete immediately.
    pub fn fade_ms(mut self, fade_ms: u32) -> Self {
        self.fade_ms = fade_ms;
        self
    }

    /// Sets the colour mode. Defaults to the red, green, blue series.
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Appends a sequence to the list.
    ///
    /// # Errors
    /// `CapacityExceeded` if the list already holds `S` sequences.
    pub fn sequence(mut self, sequence: Sequence) -> Result<Self, ConfigError> {
        self.sequences
            .push(sequence)
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Appends every sequence in `sequences`, in order.
    ///
    /// # Errors
    /// `CapacityExceeded` if the list would hold more than `S` sequences.
    pub fn sequences(mut self, sequences: &[Sequence]) -> Result<Self, ConfigError> {
        for sequence in sequences {
            self = self.sequence(*sequence)?;
        }
        Ok(self)
    }

    /// Sets the LED count and brightness.
    pub fn strip(mut self, strip: StripConfig) -> Self {
        self.strip = strip;
        self
    }

    /// Enables the schedule gate with the given active window.
    pub fn schedule(mut self, window: ScheduleWindow) -> Self {
        self.schedule = ScheduleConfig {
            enabled: true,
            window,
        };
        self
    }

    /// Sets the offset from UTC to local time, in seconds.
    pub fn utc_offset_secs(mut self, offset: i32) -> Self {
        self.utc_offset_secs = offset;
        self
    }

    /// Sets the seed used by random colour mode.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Sets the delay between boot-time connection attempts.
    pub fn retry_backoff_ms(mut self, backoff_ms: u32) -> Self {
        self.retry_backoff_ms = backoff_ms;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// A sequence with a repeat count of 0 is accepted, plays once, and is
    /// reported through [`Config::warnings`].
    ///
    /// # Errors
    /// * `NoSequences` - No sequences were added
    /// * `EmptySequence` - A sequence has no states
    /// * `AllSequencesRemovable` - Every sequence is removed when done
    /// * `EmptyPalette` - Series mode with an empty palette
    /// * `PaletteIndexOutOfRange` - Series start index beyond the palette
    /// * `ZeroLedCount` - The strip has no LEDs
    pub fn build(self) -> Result<Config<S>, ConfigError> {
        if self.sequences.is_empty() {
            return Err(ConfigError::NoSequences);
        }

        let mut warnings = 0;
        for (index, sequence) in self.sequences.iter().enumerate() {
            if sequence.is_empty() {
                return Err(ConfigError::EmptySequence { index });
            }
            if sequence.repeat() == 0 {
                warn!("sequence {} has repeat 0, playing it once", index);
                warnings += 1;
            }
        }

        if self.sequences.iter().all(Sequence::remove_when_done) {
            return Err(ConfigError::AllSequencesRemovable);
        }

        if let ColorMode::Series { palette, start } = self.color_mode {
            if palette.is_empty() {
                return Err(ConfigError::EmptyPalette);
            }
            if start >= palette.len() {
                return Err(ConfigError::PaletteIndexOutOfRange {
                    index: start,
                    len: palette.len(),
                });
            }
        }

        if self.strip.led_count == 0 {
            return Err(ConfigError::ZeroLedCount);
        }

        Ok(Config {
            hold_ms: self.hold_ms,
            fade_ms: self.fade_ms,
            color_mode: self.color_mode,
            sequences: self.sequences,
            strip: self.strip,
            schedule: self.schedule,
            utc_offset_secs: self.utc_offset_secs,
            rng_seed: self.rng_seed,
            retry_backoff_ms: self.retry_backoff_ms,
            warnings,
        })
    }
}

impl<const S: usize> Default for ConfigBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
