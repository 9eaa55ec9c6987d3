use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable identity of a tile for the lifetime of one round.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(String);

impl TileId {
    pub(crate) fn from_slot(slot: usize) -> Self {
        Self(format!("t{slot:02}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One face-down card in the grid. Two tiles share each symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub symbol: String,
}

/// Player-visible state of a tile, derived from the round bookkeeping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileFace {
    Hidden,
    Revealed,
    Matched,
}

impl TileFace {
    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::Revealed | Self::Matched)
    }
}

impl Default for TileFace {
    fn default() -> Self {
        Self::Hidden
    }
}
