use core::time::Duration;
use std::collections::BTreeSet;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Running (first flip)
/// - Running -> Won (all pairs matched)
/// - Running -> Lost (clock ran out)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoundPhase {
    NotStarted,
    Running,
    Won,
    Lost,
}

impl RoundPhase {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Round ended; no command mutates state anymore.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for RoundPhase {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlipOutcome {
    NoChange,
    Revealed,
    /// Second tile of a move went face-up; the resolution window is open.
    PairRevealed,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResolveOutcome {
    NoChange,
    Matched,
    Mismatched,
    Won,
}

impl ResolveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickOutcome {
    NoChange,
    Ticked,
    TimedOut,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShuffleOutcome {
    NoChange,
    Shuffled,
}

impl ShuffleOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Claim on one resolution window. A ticket from a superseded round or an
/// already-applied window resolves to `NoChange`, which is what makes a
/// late-firing timer harmless.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionTicket(u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionKind {
    Match,
    Mismatch,
}

/// Floors below which the flip would not be perceivable.
const MATCH_DELAY_FLOOR: Duration = Duration::from_millis(300);
const MISMATCH_DELAY_FLOOR: Duration = Duration::from_millis(700);

/// The locked sub-state between the second flip of a move and the delayed
/// application of its outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingResolution {
    ticket: ResolutionTicket,
    kind: ResolutionKind,
    first: TileId,
    second: TileId,
}

impl PendingResolution {
    pub fn ticket(&self) -> ResolutionTicket {
        self.ticket
    }

    pub fn kind(&self) -> ResolutionKind {
        self.kind
    }

    pub fn tiles(&self) -> (&TileId, &TileId) {
        (&self.first, &self.second)
    }

    /// Advisory pacing for the presentation timer. Mismatches linger longer
    /// so the player can memorize both symbols.
    pub fn suggested_delay(&self, profile: &DifficultyProfile) -> Duration {
        match self.kind {
            ResolutionKind::Match => profile.reveal_hint.max(MATCH_DELAY_FLOOR),
            ResolutionKind::Mismatch => (profile.reveal_hint * 2).max(MISMATCH_DELAY_FLOOR),
        }
    }
}

/// End-of-round banner data.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub phase: RoundPhase,
    pub moves: MoveCount,
    pub elapsed_secs: Seconds,
    pub matched_pairs: PairCount,
    pub total_pairs: PairCount,
    pub accuracy_pct: u8,
}

/// Derivation constant for the per-round seed streams (SplitMix64 odd
/// multiplier).
const SEED_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

const fn derive_seed(seed: u64, epoch: u64) -> u64 {
    seed.wrapping_add(epoch.wrapping_mul(SEED_STREAM))
}

/// One round from difficulty selection to win or loss. A new round replaces
/// the whole value; nothing carries over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    profile: DifficultyProfile,
    deck: Deck,
    revealed: Vec<TileId>,
    matched: BTreeSet<TileId>,
    move_count: MoveCount,
    elapsed_secs: Seconds,
    phase: RoundPhase,
    pending: Option<PendingResolution>,
    seed: u64,
    shuffle_epoch: u64,
    ticket_serial: u64,
}

impl Round {
    pub fn new(profile: DifficultyProfile, seed: u64) -> Result<Self> {
        let generator = RandomDeckGenerator::new(seed);
        Self::with_generator(profile, seed, generator)
    }

    /// Start a round from a custom construction strategy. The seed still
    /// drives mid-round reshuffles.
    pub fn with_generator<G: DeckGenerator>(
        profile: DifficultyProfile,
        seed: u64,
        generator: G,
    ) -> Result<Self> {
        let deck = generator.generate(&profile)?;
        Ok(Self {
            profile,
            deck,
            revealed: Vec::with_capacity(2),
            matched: BTreeSet::new(),
            move_count: 0,
            elapsed_secs: 0,
            phase: Default::default(),
            pending: None,
            seed,
            shuffle_epoch: 0,
            ticket_serial: 0,
        })
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// True only inside the resolution window.
    pub fn is_input_locked(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingResolution> {
        self.pending.as_ref()
    }

    pub fn move_count(&self) -> MoveCount {
        self.move_count
    }

    pub fn elapsed_secs(&self) -> Seconds {
        self.elapsed_secs
    }

    pub fn remaining_secs(&self) -> Seconds {
        self.profile.time_limit_secs.saturating_sub(self.elapsed_secs)
    }

    pub fn matched_pairs(&self) -> PairCount {
        (self.matched.len() / 2) as PairCount
    }

    pub fn total_pairs(&self) -> PairCount {
        (self.deck.len() / 2) as PairCount
    }

    pub fn face(&self, id: &TileId) -> TileFace {
        if self.matched.contains(id) {
            TileFace::Matched
        } else if self.revealed.contains(id) {
            TileFace::Revealed
        } else {
            TileFace::Hidden
        }
    }

    /// Tiles with their faces, in render order.
    pub fn tiles(&self) -> impl Iterator<Item = (&Tile, TileFace)> {
        self.deck.iter().map(|tile| (tile, self.face(&tile.id)))
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            phase: self.phase,
            moves: self.move_count,
            elapsed_secs: self.elapsed_secs,
            matched_pairs: self.matched_pairs(),
            total_pairs: self.total_pairs(),
            accuracy_pct: accuracy_pct(self.matched_pairs(), self.total_pairs()),
        }
    }

    /// Turn a tile face-up. No-ops: input locked, round over, unknown id,
    /// tile already revealed or matched. The first flip of the round starts
    /// the clock.
    pub fn flip(&mut self, id: &TileId) -> FlipOutcome {
        use FlipOutcome::*;

        if self.phase.is_finished() || self.pending.is_some() {
            return NoChange;
        }
        if self.matched.contains(id) || self.revealed.contains(id) {
            return NoChange;
        }
        let Some(slot) = self.deck.slot_of(id) else {
            log::trace!("flip ignored, unknown tile id {id}");
            return NoChange;
        };

        self.mark_started();
        self.revealed.push(id.clone());
        log::trace!("revealed {id} at slot {slot}");
        if self.revealed.len() < 2 {
            return Revealed;
        }

        // second tile completes the move and opens the resolution window
        self.move_count += 1;
        let first = self.revealed[0].clone();
        let second = self.revealed[1].clone();
        let kind = if self.deck.symbol(&first) == self.deck.symbol(&second) {
            ResolutionKind::Match
        } else {
            ResolutionKind::Mismatch
        };
        let ticket = self.next_ticket();
        log::debug!("move {} revealed {first} and {second}: {kind:?}", self.move_count);
        self.pending = Some(PendingResolution {
            ticket,
            kind,
            first,
            second,
        });

        if self.profile.reshuffle_policy.on_pair_revealed() {
            self.reshuffle_movable(true);
        }
        PairRevealed
    }

    /// Apply the pending match/mismatch outcome. Called by the host when
    /// its resolution timer fires; tickets that no longer refer to the open
    /// window are ignored.
    pub fn resolve(&mut self, ticket: ResolutionTicket) -> ResolveOutcome {
        use ResolveOutcome::*;

        let pending = match self.pending.take() {
            Some(pending) if pending.ticket == ticket => pending,
            other => {
                self.pending = other;
                log::trace!("stale resolution ticket ignored");
                return NoChange;
            }
        };

        self.revealed.clear();
        let outcome = match pending.kind {
            ResolutionKind::Match => {
                self.matched.insert(pending.first.clone());
                self.matched.insert(pending.second.clone());
                log::debug!("matched {} and {}", pending.first, pending.second);
                if self.matched.len() == self.deck.len() {
                    self.finish(true);
                    Won
                } else {
                    Matched
                }
            }
            ResolutionKind::Mismatch => {
                log::trace!("mismatched {} and {}", pending.first, pending.second);
                Mismatched
            }
        };

        if self.phase.is_running() && self.profile.reshuffle_policy.on_move_resolved(self.move_count)
        {
            self.reshuffle_movable(true);
        }
        outcome
    }

    /// Advance the round clock by one second. Only meaningful while the
    /// round is running; reaching the limit loses the round and discards
    /// the open resolution window.
    pub fn tick(&mut self) -> TickOutcome {
        use TickOutcome::*;

        if !self.phase.is_running() {
            return NoChange;
        }
        self.elapsed_secs += 1;
        if self.elapsed_secs >= self.profile.time_limit_secs {
            self.pending = None;
            self.finish(false);
            TimedOut
        } else {
            Ticked
        }
    }

    /// On-demand reshuffle of every tile that is neither matched nor, when
    /// `preserve_revealed` is set, currently face-up.
    pub fn reshuffle_unmatched(&mut self, preserve_revealed: bool) -> ShuffleOutcome {
        if self.phase.is_finished() {
            return ShuffleOutcome::NoChange;
        }
        self.reshuffle_movable(preserve_revealed)
    }

    fn reshuffle_movable(&mut self, preserve_revealed: bool) -> ShuffleOutcome {
        let movable: Vec<usize> = self
            .deck
            .iter()
            .enumerate()
            .filter(|(_, tile)| !self.matched.contains(&tile.id))
            .filter(|(_, tile)| !(preserve_revealed && self.revealed.contains(&tile.id)))
            .map(|(slot, _)| slot)
            .collect();
        if movable.len() < 2 {
            return ShuffleOutcome::NoChange;
        }

        self.shuffle_epoch += 1;
        let mut rng = SmallRng::seed_from_u64(derive_seed(self.seed, self.shuffle_epoch));
        self.deck.permute_slots(&movable, &mut rng);
        log::trace!(
            "reshuffled {} unmatched slots (epoch {})",
            movable.len(),
            self.shuffle_epoch
        );
        ShuffleOutcome::Shuffled
    }

    fn next_ticket(&mut self) -> ResolutionTicket {
        self.ticket_serial += 1;
        // complemented seed keeps the ticket stream apart from the
        // reshuffle stream
        ResolutionTicket(derive_seed(!self.seed, self.ticket_serial))
    }

    fn mark_started(&mut self) {
        if self.phase.is_initial() {
            self.phase = RoundPhase::Running;
            log::debug!("round started on {}", self.profile.name);
        }
    }

    fn finish(&mut self, won: bool) {
        if self.phase.is_finished() {
            return;
        }
        self.phase = if won { RoundPhase::Won } else { RoundPhase::Lost };
        log::debug!(
            "round over after {} moves and {}s: {:?}",
            self.move_count,
            self.elapsed_secs,
            self.phase
        );
    }
}
