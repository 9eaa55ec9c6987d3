use rand::Rng;
use rand::RngExt;

use crate::*;
pub use random::*;

mod random;

/// Builds the tile layout for a fresh round.
pub trait DeckGenerator {
    fn generate(self, profile: &DifficultyProfile) -> Result<Deck>;
}

/// Unbiased in-place shuffle: for each index from the last down to 1, swap
/// with a uniformly chosen index in `0..=i`. Shared by deck construction
/// and every reshuffle so seeded runs stay reproducible.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Built-in symbol alphabet. A round draws `tile_count / 2` symbols from
/// here, two tiles per symbol.
pub const SYMBOLS: &[&str] = &[
    // animals
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮",
    "🐷", "🐸", "🐵", "🦄", "🐝", "🦋", "🐌", "🐞", "🐢", "🐍", "🐙", "🦀",
    // fruits
    "🍏", "🍎", "🍐", "🍊", "🍋", "🍌", "🍉", "🍇", "🍓", "🍒", "🍑", "🍍",
    "🥝", "🥥", "🥑",
    // food
    "🍔", "🍕", "🌮", "🍦", "🎂", "🍿", "🍣", "🍜",
    // sports and objects
    "⚽", "🏀", "🎾", "🎱", "🏓", "🎨", "🎬", "🎤", "🎧", "🎮", "🎯", "🎲",
    "🚀", "🚁", "🚂", "🛸", "🌙", "⛵", "🚲",
];
