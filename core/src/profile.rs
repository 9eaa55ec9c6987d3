use core::time::Duration;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::*;

/// When the engine re-permutes unmatched tiles on its own.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReshufflePolicy {
    Never,
    EveryMove,
    EveryThirdMove,
}

impl ReshufflePolicy {
    /// Reshuffle fires together with the second flip of a move, before the
    /// resolution window closes.
    pub const fn on_pair_revealed(self) -> bool {
        matches!(self, Self::EveryMove)
    }

    /// Reshuffle fires after the given completed move resolves.
    pub const fn on_move_resolved(self, move_count: MoveCount) -> bool {
        matches!(self, Self::EveryThirdMove) && move_count % 3 == 0
    }
}

impl Default for ReshufflePolicy {
    fn default() -> Self {
        Self::Never
    }
}

/// Immutable per-tier configuration. Hosts pass an ordered list of named
/// profiles to the session; the built-in table is just the default list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub name: Cow<'static, str>,
    pub columns: u8,
    pub tile_count: u16,
    /// Advisory pacing for the presentation layer's reveal animation.
    pub reveal_hint: Duration,
    pub reshuffle_policy: ReshufflePolicy,
    pub time_limit_secs: Seconds,
}

impl DifficultyProfile {
    /// 4×4 grid, relaxed clock, stable board.
    pub const EASY: Self = Self::new_unchecked(
        "Easy",
        4,
        16,
        Duration::from_millis(800),
        ReshufflePolicy::Never,
        60,
    );

    /// 6×4 grid; some configuration revisions drop this tier entirely.
    pub const MEDIUM: Self = Self::new_unchecked(
        "Medium",
        6,
        24,
        Duration::from_millis(1000),
        ReshufflePolicy::Never,
        120,
    );

    /// 6×6 grid; the board re-permutes after every third move.
    pub const HARD: Self = Self::new_unchecked(
        "Hard",
        6,
        36,
        Duration::from_millis(1200),
        ReshufflePolicy::EveryThirdMove,
        150,
    );

    pub const fn new_unchecked(
        name: &'static str,
        columns: u8,
        tile_count: u16,
        reveal_hint: Duration,
        reshuffle_policy: ReshufflePolicy,
        time_limit_secs: Seconds,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            columns,
            tile_count,
            reveal_hint,
            reshuffle_policy,
            time_limit_secs,
        }
    }

    pub fn new(
        name: impl Into<Cow<'static, str>>,
        columns: u8,
        tile_count: u16,
        reveal_hint: Duration,
        reshuffle_policy: ReshufflePolicy,
        time_limit_secs: Seconds,
    ) -> Result<Self> {
        if columns == 0 {
            return Err(GameError::InvalidColumns);
        }
        if tile_count == 0 || tile_count % 2 != 0 {
            return Err(GameError::InvalidTileCount);
        }
        if time_limit_secs == 0 {
            return Err(GameError::InvalidTimeLimit);
        }
        Ok(Self {
            name: name.into(),
            columns,
            tile_count,
            reveal_hint,
            reshuffle_policy,
            time_limit_secs,
        })
    }

    /// The default ordered tier list.
    pub fn builtin() -> Vec<Self> {
        vec![Self::EASY, Self::MEDIUM, Self::HARD]
    }

    pub const fn pair_count(&self) -> PairCount {
        self.tile_count / 2
    }

    pub const fn rows(&self) -> u16 {
        self.tile_count.div_ceil(self.columns as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_degenerate_shapes() {
        let hint = Duration::from_millis(500);

        assert_eq!(
            DifficultyProfile::new("x", 0, 16, hint, ReshufflePolicy::Never, 60).unwrap_err(),
            GameError::InvalidColumns,
        );
        assert_eq!(
            DifficultyProfile::new("x", 4, 15, hint, ReshufflePolicy::Never, 60).unwrap_err(),
            GameError::InvalidTileCount,
        );
        assert_eq!(
            DifficultyProfile::new("x", 4, 0, hint, ReshufflePolicy::Never, 60).unwrap_err(),
            GameError::InvalidTileCount,
        );
        assert_eq!(
            DifficultyProfile::new("x", 4, 16, hint, ReshufflePolicy::Never, 0).unwrap_err(),
            GameError::InvalidTimeLimit,
        );
    }

    #[test]
    fn builtin_profiles_are_well_formed() {
        let profiles = DifficultyProfile::builtin();

        assert_eq!(profiles.len(), 3);
        for p in &profiles {
            assert!(p.columns > 0);
            assert!(p.tile_count > 0 && p.tile_count % 2 == 0);
            assert!(p.time_limit_secs > 0);
        }
        assert_eq!(profiles[0].name, "Easy");
        assert_eq!(profiles[0].tile_count, 16);
        assert_eq!(profiles[0].time_limit_secs, 60);
        assert_eq!(profiles[2].reshuffle_policy, ReshufflePolicy::EveryThirdMove);
    }

    #[test]
    fn grid_helpers_round_up_rows() {
        assert_eq!(DifficultyProfile::EASY.pair_count(), 8);
        assert_eq!(DifficultyProfile::EASY.rows(), 4);
        assert_eq!(DifficultyProfile::HARD.rows(), 6);

        let tall =
            DifficultyProfile::new("tall", 5, 12, Duration::ZERO, ReshufflePolicy::Never, 30)
                .unwrap();
        assert_eq!(tall.rows(), 3);
    }

    #[test]
    fn reshuffle_policy_triggers() {
        use ReshufflePolicy::*;

        assert!(!Never.on_pair_revealed());
        assert!(EveryMove.on_pair_revealed());
        assert!(!EveryThirdMove.on_pair_revealed());

        assert!(!Never.on_move_resolved(3));
        assert!(!EveryMove.on_move_resolved(3));
        assert!(EveryThirdMove.on_move_resolved(3));
        assert!(EveryThirdMove.on_move_resolved(6));
        assert!(!EveryThirdMove.on_move_resolved(4));
    }
}
