use core::time::Duration;

use web_time::Instant;

use crate::*;

/// Cadence of the round clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Due timer signals, in firing order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Tick,
    Resolve(ResolutionTicket),
}

/// The clock pair for the active round: one 1 Hz tick deadline and at most
/// one resolution deadline. The host polls with its own notion of `now`;
/// nothing here reads the wall clock. A `RoundTimers` is replaced together
/// with its round, which is what cancels deadlines armed for a discarded
/// round.
#[derive(Clone, Debug)]
pub struct RoundTimers {
    next_tick: Option<Instant>,
    resolution: Option<(Instant, ResolutionTicket)>,
}

impl RoundTimers {
    pub fn new() -> Self {
        Self {
            next_tick: None,
            resolution: None,
        }
    }

    pub fn is_clock_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn has_resolution(&self) -> bool {
        self.resolution.is_some()
    }

    /// Arms the 1 Hz clock; a no-op while already armed.
    pub fn arm_clock(&mut self, now: Instant) {
        if self.next_tick.is_none() {
            self.next_tick = Some(now + TICK_PERIOD);
        }
    }

    /// Replaces any previous deadline; only one resolution window exists at
    /// a time.
    pub fn schedule_resolution(&mut self, now: Instant, delay: Duration, ticket: ResolutionTicket) {
        self.resolution = Some((now + delay, ticket));
    }

    pub fn cancel_resolution(&mut self) {
        self.resolution = None;
    }

    /// Releases every deadline.
    pub fn disarm(&mut self) {
        self.next_tick = None;
        self.resolution = None;
    }

    /// Pops every deadline due at `now`, oldest first. The tick deadline
    /// re-arms from its previous target so the cadence does not drift.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut due: Vec<(Instant, TimerEvent)> = Vec::new();

        while let Some(at) = self.next_tick {
            if at > now {
                break;
            }
            due.push((at, TimerEvent::Tick));
            self.next_tick = Some(at + TICK_PERIOD);
        }

        if let Some((at, ticket)) = self.resolution {
            if at <= now {
                due.push((at, TimerEvent::Resolve(ticket)));
                self.resolution = None;
            }
        }

        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, event)| event).collect()
    }
}

impl Default for RoundTimers {
    fn default() -> Self {
        Self::new()
    }
}
