use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Grid must be at least one column wide")]
    InvalidColumns,
    #[error("Tile count must be a positive even number")]
    InvalidTileCount,
    #[error("Time limit must be at least one second")]
    InvalidTimeLimit,
    #[error("Symbol alphabet is empty")]
    EmptyAlphabet,
    #[error("No difficulty profile named `{0}`")]
    UnknownProfile(String),
    #[error("Session needs at least one difficulty profile")]
    NoProfiles,
    #[error("No active round")]
    NoActiveRound,
}

pub type Result<T> = core::result::Result<T, GameError>;
