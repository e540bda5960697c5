//! Strip sequencer: the cooperative loop tying engine, colours and outputs together.
//!
//! Provides [`StripSequencer`], which owns the strip and UV outputs, steps the
//! [`SequenceEngine`] as state durations elapse, renders each frame from the
//! colour model, and honours the [`ScheduleGate`]'s pause flag.

use crate::color::{Color, ColorPicker, OFF, fade_ratio, interpolate, scale_brightness};
use crate::config::Config;
use crate::driver::StripDriver;
use crate::schedule::ScheduleGate;
use crate::sequence::{Cursor, SequenceEngine};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::State;
use embedded_hal::digital::OutputPin;

/// The current state of a strip sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerState {
    /// Not started. Outputs are off.
    Idle,
    /// Animating.
    Running,
    /// Schedule paused mid-list. Outputs are off, cursor frozen.
    Paused,
    /// Schedule paused at the start of the list. Outputs are off and every
    /// service call is a no-op until the schedule resumes.
    Quiescent,
}

/// Timing information returned by service operations.
///
/// Indicates when the sequencer needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// A fade is in progress or a state just finished. Service again at your
    /// frame rate (10 ms works well).
    Continuous,

    /// Static hold. Nothing changes before this delay has passed.
    Delay(D),

    /// Paused by the schedule with the cursor preserved.
    Paused,

    /// Shut down by the schedule at the start of the list.
    Quiescent,
}

/// Errors that can occur during sequencer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: SequencerState,
    },
}

impl core::fmt::Display for SequencerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequencerError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but sequencer is in {:?}",
                    expected, actual
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequencerError {}

/// Drives an LED strip and a UV light through the configured sequences.
///
/// Call [`service`](Self::service) from the main loop. Each call renders at
/// most one state and advances the engine by at most one state.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source and schedule gate references
/// * `I` - Time instant type
/// * `L` - Strip driver type
/// * `U` - UV output pin type
/// * `T` - Time source implementation type
/// * `S` - Maximum number of sequences
pub struct StripSequencer<'t, I, L, U, T, const S: usize>
where
    I: TimeInstant,
    L: StripDriver,
    U: OutputPin,
    T: TimeSource<I>,
{
    strip: L,
    uv: U,
    time_source: &'t T,
    gate: &'t ScheduleGate,
    engine: SequenceEngine<S>,
    picker: ColorPicker,
    hold_ms: u64,
    fade_ms: u64,
    led_count: usize,
    state: SequencerState,
    state_started: Option<I>,
    entered: bool,
    target_picked: bool,
    uv_lit: bool,
    current_color: Color,
    next_color: Color,
}

impl<'t, I, L, U, T, const S: usize> StripSequencer<'t, I, L, U, T, S>
where
    I: TimeInstant,
    L: StripDriver,
    U: OutputPin,
    T: TimeSource<I>,
{
    /// Creates an idle sequencer, applies strip brightness and switches
    /// every output off.
    pub fn new(
        mut strip: L,
        uv: U,
        config: &Config<S>,
        time_source: &'t T,
        gate: &'t ScheduleGate,
    ) -> Self {
        strip.set_brightness(config.strip().brightness);
        let led_count = config.strip().led_count.min(strip.len());

        let mut sequencer = Self {
            strip,
            uv,
            time_source,
            gate,
            engine: config.engine(),
            picker: config.color_picker(),
            hold_ms: u64::from(config.hold_ms()),
            fade_ms: u64::from(config.fade_ms()),
            led_count,
            state: SequencerState::Idle,
            state_started: None,
            entered: false,
            target_picked: false,
            uv_lit: false,
            current_color: OFF,
            next_color: OFF,
        };
        sequencer.outputs_off();
        sequencer
    }

    /// Starts animating from the first state of the first sequence.
    ///
    /// Must be called from `Idle` state.
    pub fn start(&mut self) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        if self.state != SequencerState::Idle {
            return Err(SequencerError::InvalidState {
                expected: "Idle",
                actual: self.state,
            });
        }

        info!("sequencer starting with {} sequences", self.engine.live_count());
        self.state = SequencerState::Running;
        self.state_started = Some(self.time_source.now());
        self.entered = false;
        self.service()
    }

    /// Services the sequencer, updating outputs if necessary.
    ///
    /// Can be called from `Running`, `Paused` or `Quiescent` state. While the
    /// schedule gate is paused the engine does not advance.
    ///
    /// # Returns
    /// - `Ok(ServiceTiming::Continuous)` - Fade in progress or state finished, service at frame rate
    /// - `Ok(ServiceTiming::Delay(duration))` - Static hold, service after this delay
    /// - `Ok(ServiceTiming::Paused)` / `Ok(ServiceTiming::Quiescent)` - Schedule pause
    /// - `Err` - Sequencer not started
    pub fn service(&mut self) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        if self.state == SequencerState::Idle {
            return Err(SequencerError::InvalidState {
                expected: "Running, Paused, or Quiescent",
                actual: self.state,
            });
        }

        if self.gate.is_paused() {
            return Ok(self.pause());
        }
        if self.state != SequencerState::Running {
            self.resume();
        }

        let Some(state) = self.engine.current_state() else {
            self.recover();
            return Ok(ServiceTiming::Continuous);
        };

        let now = self.time_source.now();
        let started = *self.state_started.get_or_insert(now);
        let elapsed = now.duration_since(started).as_millis();

        Ok(self.run_state(state, elapsed, now))
    }

    /// Stops animating, switches outputs off and rewinds to the origin.
    ///
    /// Transitions to `Idle`. Can be called from any state.
    pub fn stop(&mut self) {
        self.rewind();
        self.outputs_off();
        self.state = SequencerState::Idle;
    }

    /// Returns the current state of the sequencer.
    pub fn get_state(&self) -> SequencerState {
        self.state
    }

    /// Returns the base colour of the current animation.
    pub fn current_color(&self) -> Color {
        self.current_color
    }

    /// Returns the cross-fade target colour.
    pub fn next_color(&self) -> Color {
        self.next_color
    }

    /// Returns a snapshot of the engine's cursor.
    pub fn cursor(&self) -> Cursor {
        self.engine.cursor()
    }

    /// Returns the sequence engine.
    pub fn engine(&self) -> &SequenceEngine<S> {
        &self.engine
    }

    /// Returns true if the UV light is logically on.
    pub fn uv_lit(&self) -> bool {
        self.uv_lit
    }

    /// Returns the strip driver.
    pub fn strip(&self) -> &L {
        &self.strip
    }

    /// Returns the UV output pin.
    pub fn uv(&self) -> &U {
        &self.uv
    }

    /// Releases the strip driver and UV pin.
    pub fn into_parts(self) -> (L, U) {
        (self.strip, self.uv)
    }

    fn run_state(&mut self, state: State, elapsed: u64, now: I) -> ServiceTiming<I::Duration> {
        match state {
            State::SetColor => {
                self.current_color = self.picker.next_color();
                self.push(self.current_color);
                self.complete(now)
            }
            State::FadeIn | State::FadeOut => {
                let ratio = fade_ratio(elapsed, self.fade_ms, state == State::FadeOut);
                self.push(scale_brightness(self.current_color, ratio));
                if elapsed >= self.fade_ms {
                    self.complete(now)
                } else {
                    ServiceTiming::Continuous
                }
            }
            State::CrossFade => {
                // Picked once per visit; survives a pause and resume
                if !self.target_picked {
                    self.next_color = self.picker.next_color();
                    self.target_picked = true;
                }
                let ratio = fade_ratio(elapsed, self.fade_ms, false);
                self.push(interpolate(self.current_color, self.next_color, ratio));
                if elapsed >= self.fade_ms {
                    self.current_color = self.next_color;
                    self.complete(now)
                } else {
                    ServiceTiming::Continuous
                }
            }
            State::Hold => {
                if !self.entered {
                    self.push(self.current_color);
                    self.entered = true;
                }
                self.wait_hold(elapsed, now)
            }
            State::UvOn => {
                self.set_uv(true);
                self.complete(now)
            }
            State::UvOff => {
                if elapsed >= self.hold_ms {
                    self.set_uv(false);
                }
                self.wait_hold(elapsed, now)
            }
        }
    }

    fn wait_hold(&mut self, elapsed: u64, now: I) -> ServiceTiming<I::Duration> {
        if elapsed >= self.hold_ms {
            self.complete(now)
        } else {
            ServiceTiming::Delay(I::Duration::from_millis(self.hold_ms - elapsed))
        }
    }

    /// Advances the engine and restarts the frame timer for the next state.
    fn complete(&mut self, now: I) -> ServiceTiming<I::Duration> {
        let step = self.engine.advance();
        trace!("advanced: {}", step);
        self.state_started = Some(now);
        self.entered = false;
        self.target_picked = false;
        ServiceTiming::Continuous
    }

    fn pause(&mut self) -> ServiceTiming<I::Duration> {
        match self.state {
            SequencerState::Paused => ServiceTiming::Paused,
            SequencerState::Quiescent => ServiceTiming::Quiescent,
            _ => {
                self.outputs_off();
                if self.engine.cursor().is_origin() {
                    info!("schedule pause at start of list, shutting down");
                    self.clear_registers();
                    self.state = SequencerState::Quiescent;
                    ServiceTiming::Quiescent
                } else {
                    info!("schedule pause, cursor held at {}", self.engine.cursor());
                    self.state = SequencerState::Paused;
                    ServiceTiming::Paused
                }
            }
        }
    }

    /// Picks the interrupted state up again from its beginning, keeping any
    /// cross-fade target already chosen.
    fn resume(&mut self) {
        info!("schedule resume from {}", self.state);
        self.state = SequencerState::Running;
        self.state_started = None;
        self.entered = false;
        if self.uv_lit {
            self.set_uv(true);
        }
    }

    fn recover(&mut self) {
        error!("sequence state inconsistent, outputs off and back to origin");
        self.outputs_off();
        self.rewind();
    }

    fn rewind(&mut self) {
        self.engine.reset();
        self.picker.reset();
        self.clear_registers();
    }

    fn clear_registers(&mut self) {
        self.state_started = None;
        self.entered = false;
        self.target_picked = false;
        self.uv_lit = false;
        self.current_color = OFF;
        self.next_color = OFF;
    }

    fn push(&mut self, color: Color) {
        self.strip.fill(color, 0, self.led_count);
        self.strip.show();
    }

    fn set_uv(&mut self, on: bool) {
        let result = if on { self.uv.set_high() } else { self.uv.set_low() };
        if result.is_err() {
            warn!("uv output write failed");
        }
        self.uv_lit = on;
    }

    fn outputs_off(&mut self) {
        self.strip.clear();
        if self.uv.set_low().is_err() {
            warn!("uv output write failed");
        }
    }
}
