//! Game feed ingestion.
//!
//! The upstream feed delivers one JSON document per game. It is parsed into
//! typed structs up front, so a feed with a wrong field type or a repeated
//! play id is rejected before anything reaches the store.

use crate::{
    error::Error,
    play::{Phase, Play, PlayInput},
    play_type::PlayType,
    store::{PlayStore, Upsert},
    Result,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct GameFeed {
    pub game_id: String,
    pub season: Option<u16>,
    pub week: Option<u8>,
    pub phase: Option<Phase>,
    pub plays: Vec<FeedPlay>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FeedPlay {
    pub play_id: u32,
    #[serde(alias = "desc")]
    pub description: String,
    pub down: Option<u8>,
    #[serde(alias = "ydstogo")]
    pub distance: Option<u16>,
    #[serde(alias = "yards_gained")]
    pub result_yards: Option<i32>,
    pub yardline_100: Option<u8>,
    #[serde(alias = "posteam")]
    pub offense_team: Option<String>,
    #[serde(alias = "defteam")]
    pub defense_team: Option<String>,
    pub shotgun: Option<bool>,
    pub no_huddle: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub game_id: String,
    pub inserted: usize,
    pub replaced: usize,
    pub unclassified: usize,
    pub unknown_success: usize,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.inserted + self.replaced
    }
}

impl GameFeed {
    pub fn from_json(json: &str) -> Result<Self> {
        let feed: GameFeed = serde_json::from_str(json)?;
        feed.validate()?;
        Ok(feed)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for play in &self.plays {
            if !seen.insert(play.play_id) {
                return Err(Error::DuplicatePlay {
                    game_id: self.game_id.clone(),
                    play_id: play.play_id,
                });
            }
        }
        Ok(())
    }

    /// Classifies every play of the feed.
    pub fn plays(&self) -> impl Iterator<Item = Play> + '_ {
        self.plays.iter().map(move |play| {
            Play::classify(PlayInput {
                game_id: self.game_id.clone(),
                play_id: play.play_id,
                season: self.season,
                week: self.week,
                phase: self.phase,
                description: play.description.clone(),
                down: play.down,
                distance: play.distance,
                yardline_100: play.yardline_100,
                result_yards: play.result_yards,
                offense_team: play.offense_team.clone(),
                defense_team: play.defense_team.clone(),
                shotgun: play.shotgun,
                no_huddle: play.no_huddle,
            })
        })
    }
}

/// Classifies and upserts every play of a game. Importing the same game
/// again overwrites its plays instead of duplicating them.
pub fn import_game<S: PlayStore>(feed: &GameFeed, store: &mut S) -> ImportSummary {
    log::trace!("ingest::import_game {}", feed.game_id);
    let mut summary = ImportSummary {
        game_id: feed.game_id.clone(),
        ..Default::default()
    };

    for play in feed.plays() {
        if play.play_type == PlayType::Other {
            log::trace!("Unclassified play {}: {}", play.play_id, play.description);
            summary.unclassified += 1;
        }
        if play.success.is_none() {
            summary.unknown_success += 1;
        }
        match store.upsert(play) {
            Upsert::Inserted => summary.inserted += 1,
            Upsert::Replaced => summary.replaced += 1,
        }
    }

    log::info!(
        "Imported {} plays for {} ({} new, {} replaced, {} unclassified)",
        summary.imported(),
        summary.game_id,
        summary.inserted,
        summary.replaced,
        summary.unclassified
    );
    summary
}
