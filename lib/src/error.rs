use polars::error::PolarsError;
use serde_json::Error as JsonError;
use std::io::Error as IoError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Invalid game feed: {0}")]
    Feed(#[from] JsonError),

    #[error("Duplicate play {play_id} in game {game_id}")]
    DuplicatePlay { game_id: String, play_id: u32 },
}
