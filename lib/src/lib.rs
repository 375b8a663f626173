use polars::prelude::*;
use std::path::Path;

pub mod aggregate;
pub mod classify;
mod error;
pub mod ingest;
pub mod pbp;
pub mod play;
pub mod play_type;
pub mod store;

pub use aggregate::{aggregate, aggregate_team, GroupBy, TeamAggregateRow};
pub use classify::{classify_play_type, compute_success};
pub use error::Error;
pub use play::{Phase, Play};
pub use play_type::PlayType;

pub type Result<T> = std::result::Result<T, error::Error>;

pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let mut file = std::fs::File::open(path)?;
    let df = ParquetReader::new(&mut file).finish()?;
    Ok(df)
}
