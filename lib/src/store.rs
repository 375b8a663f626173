use crate::play::{Phase, Play};
use std::collections::HashMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Persistence for classified plays, keyed by `(game_id, play_id)`.
pub trait PlayStore {
    /// Inserts the play, or overwrites the stored play with the same key.
    fn upsert(&mut self, play: Play) -> Upsert;

    /// Plays matching the scope, in storage order.
    fn query(&self, scope: &PlayScope) -> Vec<Play>;
}

/// Season/week/phase/team restriction applied before aggregation.
#[derive(Clone, Debug, Default)]
pub struct PlayScope {
    season: Option<u16>,
    week: Option<u8>,
    phase: Option<Phase>,
    team: Option<String>,
}

impl PlayScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn season(mut self, season: u16) -> Self {
        self.season = Some(season);
        self
    }

    pub fn week(mut self, week: u8) -> Self {
        self.week = Some(week);
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    // Matches the offense
    pub fn team(mut self, team: &str) -> Self {
        self.team = Some(team.to_string());
        self
    }

    pub fn matches(&self, play: &Play) -> bool {
        self.season.map_or(true, |season| play.season == Some(season))
            && self.week.map_or(true, |week| play.week == Some(week))
            && self.phase.map_or(true, |phase| play.phase == Some(phase))
            && self
                .team
                .as_deref()
                .map_or(true, |team| play.offense_team.as_deref() == Some(team))
    }
}

/// In-memory [`PlayStore`]. Rows stay in first-insertion order; a replaced
/// row keeps its original position.
#[derive(Debug, Default)]
pub struct MemoryPlayStore {
    plays: Vec<Play>,
    index: HashMap<(String, u32), usize>,
}

impl MemoryPlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }
}

impl PlayStore for MemoryPlayStore {
    fn upsert(&mut self, play: Play) -> Upsert {
        let key = (play.game_id.clone(), play.play_id);
        match self.index.get(&key) {
            Some(&position) => {
                self.plays[position] = play;
                Upsert::Replaced
            }
            None => {
                self.index.insert(key, self.plays.len());
                self.plays.push(play);
                Upsert::Inserted
            }
        }
    }

    fn query(&self, scope: &PlayScope) -> Vec<Play> {
        let plays: Vec<Play> = self
            .plays
            .iter()
            .filter(|play| scope.matches(play))
            .cloned()
            .collect();
        log::debug!("{} of {} stored plays in scope", plays.len(), self.plays.len());
        plays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play::PlayInput;

    fn play(game_id: &str, play_id: u32, team: &str, week: u8, description: &str) -> Play {
        Play::classify(PlayInput {
            game_id: game_id.to_string(),
            play_id,
            season: Some(2024),
            week: Some(week),
            phase: Some(Phase::Regular),
            description: description.to_string(),
            offense_team: Some(team.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_upsert_overwrites_by_key() {
        let mut store = MemoryPlayStore::new();
        assert_eq!(store.upsert(play("g1", 1, "KC", 1, "pass short left")), Upsert::Inserted);
        assert_eq!(store.upsert(play("g1", 2, "KC", 1, "left end")), Upsert::Inserted);
        assert_eq!(store.upsert(play("g2", 1, "BAL", 1, "punt")), Upsert::Inserted);
        assert_eq!(store.upsert(play("g1", 1, "KC", 1, "pass deep right")), Upsert::Replaced);
        assert_eq!(store.len(), 3);

        let plays = store.query(&PlayScope::new());
        assert_eq!(plays[0].key(), ("g1", 1));
        assert_eq!(plays[0].description, "pass deep right");
        assert_eq!(plays[1].key(), ("g1", 2));
        assert_eq!(plays[2].key(), ("g2", 1));
    }

    #[test]
    fn test_scope_filters() {
        let mut store = MemoryPlayStore::new();
        store.upsert(play("g1", 1, "KC", 1, "pass short left"));
        store.upsert(play("g1", 2, "BAL", 1, "left end"));
        store.upsert(play("g2", 1, "KC", 2, "punt"));

        assert_eq!(store.query(&PlayScope::new().team("KC")).len(), 2);
        assert_eq!(store.query(&PlayScope::new().team("KC").week(2)).len(), 1);
        assert_eq!(store.query(&PlayScope::new().season(2023)).len(), 0);
        assert_eq!(store.query(&PlayScope::new().phase(Phase::Regular)).len(), 3);
        assert_eq!(store.query(&PlayScope::new().phase(Phase::Postseason)).len(), 0);
    }
}
