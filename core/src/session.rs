use web_time::Instant;

use crate::*;

/// What `advance` observed while pumping due timers into the round.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Ticked,
    Matched,
    Mismatched,
    Won(RoundSummary),
    Lost(RoundSummary),
}

/// Presentation-facing command surface: the ordered difficulty list, one
/// active round, and its timers. Round and timers are replaced together,
/// so a deadline armed for a discarded round can never mutate its
/// replacement.
#[derive(Clone, Debug)]
pub struct GameSession {
    profiles: Vec<DifficultyProfile>,
    round: Option<Round>,
    timers: RoundTimers,
    current: Option<usize>,
    seed_state: u64,
}

impl GameSession {
    pub fn new(profiles: Vec<DifficultyProfile>, seed: u64) -> Result<Self> {
        if profiles.is_empty() {
            return Err(GameError::NoProfiles);
        }
        Ok(Self {
            profiles,
            round: None,
            timers: RoundTimers::new(),
            current: None,
            seed_state: seed,
        })
    }

    /// The built-in tier list with a host-provided seed.
    pub fn with_builtin_profiles(seed: u64) -> Self {
        Self::new(DifficultyProfile::builtin(), seed).expect("builtin profile list is not empty")
    }

    pub fn profiles(&self) -> &[DifficultyProfile] {
        &self.profiles
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn current_profile(&self) -> Option<&DifficultyProfile> {
        self.current.map(|index| &self.profiles[index])
    }

    /// Start a round of the named difficulty. Unknown names are host
    /// misuse and surface as an error, unlike gameplay input.
    pub fn start(&mut self, name: &str) -> Result<&Round> {
        let index = self
            .profiles
            .iter()
            .position(|profile| profile.name == name)
            .ok_or_else(|| GameError::UnknownProfile(name.to_string()))?;
        self.begin(index)
    }

    /// Restart the current difficulty with a fresh deck and seed.
    pub fn restart(&mut self) -> Result<&Round> {
        let index = self.current.ok_or(GameError::NoActiveRound)?;
        self.begin(index)
    }

    /// Back to difficulty selection. Releases the clock and any pending
    /// resolution deadline.
    pub fn to_menu(&mut self) {
        self.timers.disarm();
        self.round = None;
        self.current = None;
    }

    pub fn flip(&mut self, id: &TileId, now: Instant) -> FlipOutcome {
        let Some(round) = self.round.as_mut() else {
            return FlipOutcome::NoChange;
        };

        let outcome = round.flip(id);
        if round.is_running() {
            self.timers.arm_clock(now);
        }
        if outcome == FlipOutcome::PairRevealed {
            if let Some(pending) = round.pending() {
                let delay = pending.suggested_delay(round.profile());
                self.timers.schedule_resolution(now, delay, pending.ticket());
            }
        }
        outcome
    }

    /// On-demand reshuffle of the current board.
    pub fn reshuffle(&mut self, preserve_revealed: bool) -> ShuffleOutcome {
        match self.round.as_mut() {
            Some(round) => round.reshuffle_unmatched(preserve_revealed),
            None => ShuffleOutcome::NoChange,
        }
    }

    /// Drive every due timer into the round and report what happened.
    /// Terminal events release the clock.
    pub fn advance(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let Some(round) = self.round.as_mut() else {
            return events;
        };

        for event in self.timers.poll(now) {
            match event {
                TimerEvent::Tick => match round.tick() {
                    TickOutcome::Ticked => events.push(SessionEvent::Ticked),
                    TickOutcome::TimedOut => {
                        self.timers.disarm();
                        events.push(SessionEvent::Lost(round.summary()));
                    }
                    TickOutcome::NoChange => {}
                },
                TimerEvent::Resolve(ticket) => match round.resolve(ticket) {
                    ResolveOutcome::Matched => events.push(SessionEvent::Matched),
                    ResolveOutcome::Mismatched => events.push(SessionEvent::Mismatched),
                    ResolveOutcome::Won => {
                        self.timers.disarm();
                        events.push(SessionEvent::Won(round.summary()));
                    }
                    ResolveOutcome::NoChange => {}
                },
            }
        }
        events
    }

    fn begin(&mut self, index: usize) -> Result<&Round> {
        let profile = self.profiles[index].clone();
        let seed = self.next_seed();
        log::debug!("starting a {} round (seed {seed:#018x})", profile.name);

        // replacing round and timers together is the cancellation rule
        self.timers.disarm();
        let round = Round::new(profile, seed)?;
        self.current = Some(index);
        Ok(self.round.insert(round))
    }

    /// SplitMix64 step; one fresh seed per round.
    fn next_seed(&mut self) -> u64 {
        self.seed_state = self.seed_state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.seed_state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
