//! Shared test infrastructure for strip-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use strip_sequencer::{
    AlarmMatch, Clock, Color, Connectivity, Credentials, Millis, OFF, StripDriver, TimeOfDay,
    TimeSource, TimeSync,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock millisecond counter with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<Millis>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current_time: Cell::new(Millis(millis)),
        }
    }

    /// Advance time by the given number of milliseconds, wrapping like hardware
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(Millis(current.0.wrapping_add(millis)));
    }
}

impl TimeSource<Millis> for MockTimeSource {
    fn now(&self) -> Millis {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Strip
// ============================================================================

/// Mock strip that records every frame pushed with `show`
pub struct MockStrip {
    pixels: Vec<Color>,
    shown: Vec<Color>,
    brightness: Option<u8>,
}

impl MockStrip {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![OFF; len],
            shown: Vec::new(),
            brightness: None,
        }
    }

    /// Colour of the first LED in every frame shown so far
    pub fn shown(&self) -> &[Color] {
        &self.shown
    }

    pub fn show_count(&self) -> usize {
        self.shown.len()
    }

    pub fn last_shown(&self) -> Option<Color> {
        self.shown.last().copied()
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }
}

impl StripDriver for MockStrip {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn fill(&mut self, color: Color, offset: usize, count: usize) {
        let end = offset.saturating_add(count).min(self.pixels.len());
        for pixel in self.pixels.iter_mut().take(end).skip(offset) {
            *pixel = color;
        }
    }

    fn show(&mut self) {
        self.shown.push(self.pixels[0]);
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = Some(level);
    }
}

// ============================================================================
// Mock UV Pin
// ============================================================================

/// Mock output pin recording every level written
pub struct MockPin {
    history: Vec<PinState>,
}

impl MockPin {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    pub fn is_high(&self) -> bool {
        self.history.last() == Some(&PinState::High)
    }

    pub fn history(&self) -> &[PinState] {
        &self.history
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.history.push(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.history.push(PinState::High);
        Ok(())
    }
}

// ============================================================================
// Mock RTC
// ============================================================================

/// Mock real-time clock with a settable time and an alarm log
pub struct MockClock {
    now: TimeOfDay,
    epoch: Option<u64>,
    alarms: Vec<(TimeOfDay, AlarmMatch)>,
}

impl MockClock {
    pub fn at(hour: u8, minute: u8) -> Self {
        Self {
            now: TimeOfDay::new(hour, minute).unwrap(),
            epoch: None,
            alarms: Vec::new(),
        }
    }

    pub fn set(&mut self, hour: u8, minute: u8) {
        self.now = TimeOfDay::new(hour, minute).unwrap();
    }

    pub fn epoch(&self) -> Option<u64> {
        self.epoch
    }

    pub fn alarms(&self) -> &[(TimeOfDay, AlarmMatch)] {
        &self.alarms
    }

    pub fn last_alarm(&self) -> Option<TimeOfDay> {
        self.alarms.last().map(|(target, _)| *target)
    }
}

impl Clock for MockClock {
    fn now(&self) -> TimeOfDay {
        self.now
    }

    fn set_epoch(&mut self, local_secs: u64) {
        self.epoch = Some(local_secs);
        self.now = TimeOfDay::from_epoch(local_secs);
    }

    fn set_alarm(&mut self, target: TimeOfDay, policy: AlarmMatch) {
        self.alarms.push((target, policy));
    }
}

// ============================================================================
// Mock Boot Collaborators
// ============================================================================

/// Delay that records requested milliseconds instead of sleeping
pub struct MockDelay {
    pub calls: Vec<u32>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(ms);
    }
}

/// Network that fails a fixed number of times before connecting
pub struct MockNet {
    failures_left: u32,
    pub attempts: u32,
}

impl MockNet {
    pub fn failing(times: u32) -> Self {
        Self {
            failures_left: times,
            attempts: 0,
        }
    }
}

impl Connectivity for MockNet {
    fn connect(&mut self, _credentials: &Credentials) -> bool {
        self.attempts += 1;
        if self.failures_left == 0 {
            true
        } else {
            self.failures_left -= 1;
            false
        }
    }
}

/// Time server that fails a fixed number of times before answering
pub struct MockSync {
    failures_left: u32,
    epoch: u64,
    pub requests: u32,
}

impl MockSync {
    pub fn failing(times: u32, epoch: u64) -> Self {
        Self {
            failures_left: times,
            epoch,
            requests: 0,
        }
    }
}

impl TimeSync for MockSync {
    fn fetch_epoch(&mut self) -> Option<u64> {
        self.requests += 1;
        if self.failures_left == 0 {
            Some(self.epoch)
        } else {
            self.failures_left -= 1;
            None
        }
    }
}

pub const CREDENTIALS: Credentials = Credentials {
    ssid: "workshop",
    password: "hunter22",
};

// ============================================================================
// Test Helper Functions
// ============================================================================

pub fn rgb(red: u8, green: u8, blue: u8) -> Color {
    Color::new(red, green, blue)
}

/// Builds a time of day, panicking on invalid input
pub fn tod(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute).unwrap()
}
