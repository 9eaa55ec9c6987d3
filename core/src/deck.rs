use core::ops::Index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Ordered tile layout for one round; slot order is render order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    tiles: Vec<Tile>,
}

impl Deck {
    pub(crate) fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Tile> {
        self.tiles.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn slot_of(&self, id: &TileId) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.id == *id)
    }

    pub fn tile(&self, id: &TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id == *id)
    }

    pub fn symbol(&self, id: &TileId) -> Option<&str> {
        self.tile(id).map(|tile| tile.symbol.as_str())
    }

    /// Re-permutes exactly the given slots; every other slot keeps its tile.
    /// The movable tiles are shuffled with the shared unbiased routine and
    /// re-interleaved into the original slot order.
    pub(crate) fn permute_slots<R: Rng + ?Sized>(&mut self, slots: &[usize], rng: &mut R) {
        let mut movable: Vec<Tile> = slots.iter().map(|&slot| self.tiles[slot].clone()).collect();
        fisher_yates(&mut movable, rng);
        for (slot, tile) in slots.iter().copied().zip(movable) {
            self.tiles[slot] = tile;
        }
    }
}

impl Index<usize> for Deck {
    type Output = Tile;

    fn index(&self, slot: usize) -> &Self::Output {
        &self.tiles[slot]
    }
}
