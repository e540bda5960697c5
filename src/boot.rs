//! Boot-time clock synchronisation.
//!
//! The only blocking code in the crate. Connecting and fetching the epoch are
//! retried forever with a fixed backoff: without a network the device has no
//! other way to learn the time, and nothing else runs before this returns.

use crate::config::Config;
use crate::schedule::{Clock, GatePhase, ScheduleGate};
use embedded_hal::delay::DelayNs;

/// Network credentials, compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: &'static str,
    pub password: &'static str,
}

/// Network connectivity collaborator.
pub trait Connectivity {
    /// Attempts to join the network. Returns true once connected.
    fn connect(&mut self, credentials: &Credentials) -> bool;
}

/// Network time collaborator.
pub trait TimeSync {
    /// Fetches UTC seconds since the epoch, or `None` if the request failed.
    fn fetch_epoch(&mut self) -> Option<u64>;
}

/// Connects and fetches the UTC epoch, retrying each step every `backoff_ms`.
///
/// Never gives up.
pub fn acquire_epoch<N, Y, D>(
    net: &mut N,
    sync: &mut Y,
    delay: &mut D,
    credentials: &Credentials,
    backoff_ms: u32,
) -> u64
where
    N: Connectivity,
    Y: TimeSync,
    D: DelayNs,
{
    let mut retries: u32 = 0;
    while !net.connect(credentials) {
        retries = retries.wrapping_add(1);
        warn!("connect failed ({} so far), retrying in {} ms", retries, backoff_ms);
        delay.delay_ms(backoff_ms);
    }
    info!("network up after {} retries", retries);

    loop {
        if let Some(epoch) = sync.fetch_epoch() {
            debug!("epoch {}", epoch);
            return epoch;
        }
        warn!("time sync failed, retrying in {} ms", backoff_ms);
        delay.delay_ms(backoff_ms);
    }
}

/// Seeds the clock from network time and runs the gate's boot evaluation.
///
/// With the schedule disabled this touches neither network nor clock and
/// reports `Active`.
pub fn sync_clock<C, N, Y, D, const S: usize>(
    config: &Config<S>,
    gate: &ScheduleGate,
    clock: &mut C,
    net: &mut N,
    sync: &mut Y,
    delay: &mut D,
    credentials: &Credentials,
) -> GatePhase
where
    C: Clock,
    N: Connectivity,
    Y: TimeSync,
    D: DelayNs,
{
    if !config.schedule().enabled {
        debug!("schedule disabled, skipping time sync");
        return GatePhase::Active;
    }

    let utc = acquire_epoch(net, sync, delay, credentials, config.retry_backoff_ms());
    clock.set_epoch(config.local_epoch(utc));
    gate.evaluate(clock)
}
