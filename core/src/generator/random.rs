use rand::prelude::*;

use super::*;

/// Seeded construction strategy: the same seed always yields the same deck.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDeckGenerator {
    seed: u64,
    alphabet: &'static [&'static str],
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_alphabet(seed, SYMBOLS)
    }

    pub fn with_alphabet(seed: u64, alphabet: &'static [&'static str]) -> Self {
        Self { seed, alphabet }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(self, profile: &DifficultyProfile) -> Result<Deck> {
        if self.alphabet.is_empty() {
            return Err(GameError::EmptyAlphabet);
        }

        let pair_count = usize::from(profile.pair_count());
        let mut rng = SmallRng::seed_from_u64(self.seed);

        // Shuffled symbol pool; when the alphabet is smaller than the pair
        // count we cycle it, reshuffling independently on every pass.
        let mut pool: Vec<&str> = self.alphabet.to_vec();
        fisher_yates(&mut pool, &mut rng);
        if pair_count > pool.len() {
            log::warn!(
                "alphabet holds {} symbols but {} pairs were requested, symbols will repeat",
                pool.len(),
                pair_count
            );
        }

        let mut values = Vec::with_capacity(pair_count * 2);
        let mut cursor = 0;
        while values.len() < pair_count * 2 {
            if cursor == pool.len() {
                fisher_yates(&mut pool, &mut rng);
                cursor = 0;
            }
            values.push(pool[cursor]);
            values.push(pool[cursor]);
            cursor += 1;
        }

        fisher_yates(&mut values, &mut rng);

        let tiles = values
            .into_iter()
            .enumerate()
            .map(|(slot, symbol)| Tile {
                id: TileId::from_slot(slot),
                symbol: symbol.to_string(),
            })
            .collect();
        Ok(Deck::from_tiles(tiles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn symbol_counts(deck: &Deck) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for tile in deck.iter() {
            *counts.entry(tile.symbol.clone()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn same_seed_same_deck() {
        let profile = DifficultyProfile::EASY;

        let a = RandomDeckGenerator::new(42).generate(&profile).unwrap();
        let b = RandomDeckGenerator::new(42).generate(&profile).unwrap();
        let c = RandomDeckGenerator::new(43).generate(&profile).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn deck_holds_two_tiles_per_symbol_with_unique_ids() {
        for profile in DifficultyProfile::builtin() {
            let deck = RandomDeckGenerator::new(7).generate(&profile).unwrap();

            assert_eq!(deck.len(), usize::from(profile.tile_count));
            assert!(deck.len() % 2 == 0);
            assert!(symbol_counts(&deck).values().all(|&count| count == 2));

            let mut ids: Vec<&TileId> = deck.iter().map(|tile| &tile.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), deck.len());
        }
    }

    #[test]
    fn undersized_alphabet_cycles_with_reshuffles() {
        const TINY: &[&str] = &["A", "B"];
        let profile =
            DifficultyProfile::new("tiny", 4, 8, core::time::Duration::ZERO, ReshufflePolicy::Never, 30)
                .unwrap();

        let deck = RandomDeckGenerator::with_alphabet(5, TINY).generate(&profile).unwrap();

        // 4 pairs over 2 symbols: each symbol appears in exactly 2 pairs
        assert_eq!(deck.len(), 8);
        assert!(symbol_counts(&deck).values().all(|&count| count == 4));
    }

    #[test]
    fn empty_alphabet_is_rejected() {
        const EMPTY: &[&str] = &[];
        let profile = DifficultyProfile::EASY;

        let result = RandomDeckGenerator::with_alphabet(1, EMPTY).generate(&profile);

        assert_eq!(result.unwrap_err(), GameError::EmptyAlphabet);
    }
}
