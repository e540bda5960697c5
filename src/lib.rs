#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`State`**: One animation behaviour (set colour, fade, hold, cross-fade, UV on/off)
//! - **`Sequence`**: An ordered list of states with a repeat count and a remove-when-done flag
//! - **`SequenceEngine`**: Steps a cursor through the live sequence list one state at a time
//! - **`StripSequencer`**: The cooperative loop that renders each state onto the strip and UV output
//! - **`ScheduleGate`**: Pauses and resumes animation from a daily time-of-day window
//! - **`StripDriver`**: Trait to implement for your LED strip (or use `SmartLedStrip`)
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`Clock`**: Trait to implement for your real-time clock
//!
//! Colours are `Srgb<u8>`, the strip's native depth. Brightness scaling rounds
//! down and interpolation rounds to nearest, channel by channel.

#[macro_use]
mod fmt;

pub use palette::Srgb;

pub mod boot;
pub mod color;
pub mod config;
pub mod driver;
pub mod schedule;
pub mod sequence;
pub mod sequencer;
pub mod time;
pub mod types;

pub use boot::{Connectivity, Credentials, TimeSync, acquire_epoch, sync_clock};
pub use color::{Color, ColorMode, ColorPicker, OFF, SERIES};
pub use config::{Config, ConfigBuilder, DEFAULT_SEQUENCES, ScheduleConfig, StripConfig};
pub use driver::{SmartLedStrip, StripDriver};
pub use schedule::{
    AlarmMatch, Clock, GatePhase, ScheduleGate, ScheduleWindow, TimeOfDay, is_within_window,
};
pub use sequence::{Advance, Cursor, Sequence, SequenceEngine};
pub use sequencer::{SequencerError, SequencerState, ServiceTiming, StripSequencer};
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
pub use types::{ConfigError, State, StateTiming};

/// Sequencer over a wrapping millisecond counter with room for 8 sequences.
pub type StripSequencer8<'t, L, U, T> = StripSequencer<'t, Millis, L, U, T, 8>;
