//! Daily on/off window driven by real-time-clock alarms.
//!
//! The [`ScheduleGate`] owns a single atomic pause flag. It is evaluated once
//! at boot against the clock; after that an alarm is armed for the next edge
//! of the window, and the alarm handler flips the flag and arms the opposite
//! edge. The gate never touches the LED driver: the sequencer observes the
//! flag from its own loop and switches outputs off there.

use crate::types::ConfigError;
use core::sync::atomic::{AtomicBool, Ordering};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Midnight.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    /// Creates a time of day.
    ///
    /// # Errors
    /// `InvalidTimeOfDay` if `hour > 23` or `minute > 59`.
    pub const fn new(hour: u8, minute: u8) -> Result<Self, ConfigError> {
        if hour > 23 || minute > 59 {
            return Err(ConfigError::InvalidTimeOfDay { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Returns the hour (0-23).
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight.
    pub const fn minutes(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Builds a time of day from minutes since midnight, wrapping past 24h.
    pub const fn from_minutes(minutes: u16) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        }
    }

    /// The following minute, wrapping at midnight.
    pub const fn next_minute(&self) -> Self {
        Self::from_minutes(self.minutes() + 1)
    }

    /// Time of day for a count of seconds since the epoch.
    pub const fn from_epoch(secs: u64) -> Self {
        let minutes = (secs / 60) % MINUTES_PER_DAY as u64;
        Self::from_minutes(minutes as u16)
    }
}

/// Returns true if `current` lies in `[start, end]`.
///
/// When `end` is not after `start` the window crosses midnight and the test
/// becomes `current >= start || current <= end`.
pub fn is_within_window(current: TimeOfDay, start: TimeOfDay, end: TimeOfDay) -> bool {
    let (current, start, end) = (current.minutes(), start.minutes(), end.minutes());
    if end <= start {
        current >= start || current <= end
    } else {
        current >= start && current <= end
    }
}

/// The part of the day during which the sequencer is allowed to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl ScheduleWindow {
    /// Creates a window from start and end times.
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Returns true if `now` is inside the window.
    pub fn contains(&self, now: TimeOfDay) -> bool {
        is_within_window(now, self.start, self.end)
    }

    /// Returns true if the window leaves no minute of the day uncovered.
    ///
    /// That is the case exactly when the minute after `end` is still inside,
    /// e.g. equal bounds or `00:00-23:59`.
    pub fn is_whole_day(&self) -> bool {
        self.contains(self.end.next_minute())
    }

    /// Returns the first minute at which the phase differs from `phase`.
    ///
    /// A whole-day window has no edges and yields `None`.
    pub fn next_boundary(&self, phase: GatePhase) -> Option<TimeOfDay> {
        if self.is_whole_day() {
            return None;
        }
        Some(match phase {
            GatePhase::Active => self.end.next_minute(),
            GatePhase::Paused => self.start,
        })
    }
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self::new(TimeOfDay::MIDNIGHT, TimeOfDay::from_minutes(MINUTES_PER_DAY - 1))
    }
}

/// Which alarm fields the clock must match before firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmMatch {
    pub hour: bool,
    pub minute: bool,
}

impl AlarmMatch {
    /// Fires once a day at the given hour and minute.
    pub const DAILY: AlarmMatch = AlarmMatch {
        hour: true,
        minute: true,
    };
}

/// Real-time clock collaborator.
pub trait Clock {
    /// Returns the current local time of day.
    fn now(&self) -> TimeOfDay;

    /// Sets the clock from local seconds since the epoch.
    fn set_epoch(&mut self, local_secs: u64);

    /// Arms a one-shot alarm, replacing any alarm already armed.
    ///
    /// When it fires the platform calls [`ScheduleGate::on_alarm`].
    fn set_alarm(&mut self, target: TimeOfDay, policy: AlarmMatch);
}

/// Whether the gate currently lets the sequencer animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GatePhase {
    Active,
    Paused,
}

/// Pauses and resumes animation according to a [`ScheduleWindow`].
///
/// All methods take `&self`, so the gate can live in a `static` shared between
/// the main loop and the alarm handler. The pause flag is the only state the
/// two contexts share.
#[derive(Debug)]
pub struct ScheduleGate {
    window: ScheduleWindow,
    paused: AtomicBool,
}

impl ScheduleGate {
    /// Creates a gate in the active phase.
    pub const fn new(window: ScheduleWindow) -> Self {
        Self {
            window,
            paused: AtomicBool::new(false),
        }
    }

    /// Creates a gate that never pauses. Used when the schedule is disabled.
    pub const fn always_active() -> Self {
        Self::new(ScheduleWindow::new(
            TimeOfDay::MIDNIGHT,
            TimeOfDay::from_minutes(MINUTES_PER_DAY - 1),
        ))
    }

    /// Returns the configured window.
    pub fn window(&self) -> ScheduleWindow {
        self.window
    }

    /// Returns true if animation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Returns the current phase.
    pub fn phase(&self) -> GatePhase {
        if self.is_paused() {
            GatePhase::Paused
        } else {
            GatePhase::Active
        }
    }

    /// Returns the time at which the next alarm should fire, if any.
    pub fn next_boundary(&self) -> Option<TimeOfDay> {
        self.window.next_boundary(self.phase())
    }

    /// Decides the phase from the clock and arms the alarm for the next edge.
    ///
    /// Called once at boot, after the clock has been set.
    pub fn evaluate<C: Clock>(&self, clock: &mut C) -> GatePhase {
        let now = clock.now();
        let paused = !self.window.contains(now);
        self.paused.store(paused, Ordering::Release);
        let phase = self.phase();
        info!("schedule evaluated at {}:{}: {}", now.hour(), now.minute(), phase);
        self.arm(clock);
        phase
    }

    /// Alarm handler: flips the pause flag and arms the opposite edge.
    ///
    /// Safe to call from interrupt context. Performs no driver I/O. A
    /// whole-day window stays active, so a stray alarm cannot pause it.
    pub fn on_alarm<C: Clock>(&self, clock: &mut C) -> GatePhase {
        let paused = !self.window.is_whole_day() && !self.paused.load(Ordering::Acquire);
        self.paused.store(paused, Ordering::Release);
        self.arm(clock);
        self.phase()
    }

    fn arm<C: Clock>(&self, clock: &mut C) {
        match self.next_boundary() {
            Some(target) => {
                debug!("alarm armed for {}:{}", target.hour(), target.minute());
                clock.set_alarm(target, AlarmMatch::DAILY);
            }
            None => debug!("window covers the whole day, no alarm armed"),
        }
    }
}

impl Default for ScheduleGate {
    fn default() -> Self {
        Self::always_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_rejects_out_of_range() {
        assert_eq!(
            TimeOfDay::new(24, 0),
            Err(ConfigError::InvalidTimeOfDay { hour: 24, minute: 0 })
        );
        assert!(TimeOfDay::new(23, 60).is_err());
        assert!(TimeOfDay::new(23, 59).is_ok());
    }

    #[test]
    fn next_minute_wraps_at_midnight() {
        let t = TimeOfDay::new(23, 59).unwrap();
        assert_eq!(t.next_minute(), TimeOfDay::MIDNIGHT);
    }

    #[test]
    fn from_epoch_uses_seconds_within_day() {
        // 1970-01-02 13:45:30
        let secs = 86_400 + 13 * 3600 + 45 * 60 + 30;
        assert_eq!(TimeOfDay::from_epoch(secs), TimeOfDay::new(13, 45).unwrap());
    }
}
