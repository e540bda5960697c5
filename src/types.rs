//! Core types for sequence construction.

/// One atomic animation behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Pick a new colour and show it at full brightness.
    SetColor,

    /// Ramp the current colour from black to full brightness.
    FadeIn,

    /// Show the current colour and wait.
    Hold,

    /// Ramp the current colour from full brightness to black.
    FadeOut,

    /// Blend from the current colour to a freshly picked one.
    CrossFade,

    /// Switch the UV light on.
    UvOn,

    /// Wait, then switch the UV light off.
    UvOff,
}

/// Which configured duration a state runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateTiming {
    /// Completes in the tick it starts.
    Instant,

    /// Runs for the fade duration.
    Fade,

    /// Runs for the hold duration.
    Hold,
}

impl State {
    /// Returns the duration class of this state.
    pub const fn timing(self) -> StateTiming {
        match self {
            State::SetColor | State::UvOn => StateTiming::Instant,
            State::FadeIn | State::FadeOut | State::CrossFade => StateTiming::Fade,
            State::Hold | State::UvOff => StateTiming::Hold,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No sequences provided.
    NoSequences,

    /// A sequence has no states.
    EmptySequence { index: usize },

    /// Every sequence is removed when done, so the list would run dry.
    AllSequencesRemovable,

    /// Series colour mode with an empty palette.
    EmptyPalette,

    /// Series start index beyond the palette.
    PaletteIndexOutOfRange { index: usize, len: usize },

    /// Sequence list capacity exceeded.
    CapacityExceeded,

    /// The strip has no LEDs.
    ZeroLedCount,

    /// Schedule boundary is not a valid time of day.
    InvalidTimeOfDay { hour: u8, minute: u8 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::NoSequences => write!(f, "at least one sequence is required"),
            ConfigError::EmptySequence { index } => {
                write!(f, "sequence {} must have at least one state", index)
            }
            ConfigError::AllSequencesRemovable => {
                write!(
                    f,
                    "at least one sequence must stay in the list (remove_when_done = false)"
                )
            }
            ConfigError::EmptyPalette => write!(f, "series colour mode needs a non-empty palette"),
            ConfigError::PaletteIndexOutOfRange { index, len } => {
                write!(f, "palette index {} out of range for palette of {}", index, len)
            }
            ConfigError::CapacityExceeded => write!(f, "sequence capacity exceeded"),
            ConfigError::ZeroLedCount => write!(f, "strip must have at least one LED"),
            ConfigError::InvalidTimeOfDay { hour, minute } => {
                write!(f, "{:02}:{:02} is not a valid time of day", hour, minute)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
