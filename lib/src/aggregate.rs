use crate::play::{Phase, Play};
use crate::Result;
use derive_deref::Deref;
use itertools::Itertools;
use parse_display::{Display, FromStr};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Group label used for plays without an offense team.
pub const UNKNOWN_TEAM: &str = "unknown";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Display, FromStr)]
#[display(style = "kebab-case")]
pub enum GroupBy {
    #[default]
    Team,
    TeamWeek,
    TeamPhase,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct GroupKey {
    team: String,
    week: Option<u8>,
    phase: Option<Phase>,
}

impl GroupKey {
    fn of(play: &Play, group_by: GroupBy) -> Self {
        let team = match play.offense_team.as_deref() {
            Some(team) if !team.is_empty() => team.to_string(),
            _ => UNKNOWN_TEAM.to_string(),
        };
        let (week, phase) = match group_by {
            GroupBy::Team => (None, None),
            GroupBy::TeamWeek => (play.week, None),
            GroupBy::TeamPhase => (None, play.phase),
        };
        GroupKey { team, week, phase }
    }

    fn label(&self, group_by: GroupBy) -> String {
        match group_by {
            GroupBy::Team => self.team.clone(),
            GroupBy::TeamWeek => match self.week {
                Some(week) => format!("{} week {}", self.team, week),
                None => format!("{} week {}", self.team, UNKNOWN_TEAM),
            },
            GroupBy::TeamPhase => match self.phase {
                Some(phase) => format!("{} {}", self.team, phase),
                None => format!("{} {}", self.team, UNKNOWN_TEAM),
            },
        }
    }
}

/// Offensive summary for one team bucket. Rates are fractions in `[0, 1]`
/// (or per-play/per-game averages) and are `0.0` whenever their
/// denominator is zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TeamAggregateRow {
    pub team_id: String,
    pub label: String,
    pub season: Option<u16>,
    pub week: Option<u8>,
    pub phase: Option<Phase>,

    pub games: u32,
    pub plays: u32,
    pub pass_plays: u32,
    pub run_plays: u32,
    pub sacks: u32,
    pub scrambles: u32,
    pub dropbacks: u32,
    pub interceptions: u32,
    pub first_downs: u32,
    pub successes: u32,
    pub stops: u32,
    pub explosive_plays: u32,
    pub shotgun_plays: u32,
    pub no_huddle_plays: u32,
    pub third_down_attempts: u32,
    pub third_down_conversions: u32,
    pub red_zone_plays: u32,
    pub red_zone_successes: u32,
    /// Sack count standing in for pressures; the feed carries no QB hit data,
    /// so treat this as approximate.
    pub pressure_proxy: u32,

    pub total_yards: i64,
    pub pass_yards: i64,
    pub run_yards: i64,

    pub sack_rate: f64,
    pub success_rate: f64,
    pub first_down_rate: f64,
    pub yards_per_play: f64,
    pub yards_per_pass: f64,
    pub yards_per_rush: f64,
    pub shotgun_rate: f64,
    pub no_huddle_rate: f64,
    pub explosive_rate: f64,
    pub interception_rate: f64,
    pub third_down_rate: f64,
    pub red_zone_success_rate: f64,
    pub plays_per_game: f64,
    pub yards_per_game: f64,
}

/// `numerator / denominator`, or `0.0` when the denominator is not positive.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn count<F: Fn(&Play) -> bool>(plays: &[&Play], predicate: F) -> u32 {
    plays.iter().filter(|play| predicate(**play)).count() as u32
}

fn yards<F: Fn(&Play) -> bool>(plays: &[&Play], predicate: F) -> i64 {
    plays
        .iter()
        .filter(|play| predicate(**play))
        .map(|play| i64::from(play.yards()))
        .sum()
}

/// Aggregates a single team bucket. An empty slice yields zero counts and
/// zero rates.
pub fn aggregate_team(team_id: &str, plays: &[Play]) -> TeamAggregateRow {
    let plays: Vec<&Play> = plays.iter().collect();
    summarize(team_id.to_string(), team_id.to_string(), &plays)
}

fn summarize(team_id: String, label: String, plays: &[&Play]) -> TeamAggregateRow {
    let seasons: Vec<u16> = plays.iter().filter_map(|p| p.season).unique().collect();
    let season = match seasons.as_slice() {
        [season] => Some(*season),
        _ => None,
    };

    let games = plays.iter().map(|p| p.game_id.as_str()).unique().count() as u32;
    let total = plays.len() as u32;
    let pass_plays = count(plays, Play::is_pass);
    let run_plays = count(plays, Play::is_run);
    let sacks = count(plays, Play::is_sack);
    let dropbacks = pass_plays + sacks;
    let interceptions = count(plays, Play::is_interception);
    let first_downs = count(plays, Play::is_first_down);
    let successes = count(plays, Play::is_success);
    let explosive_plays = count(plays, Play::is_explosive);
    let shotgun_plays = count(plays, |p| p.shotgun);
    let no_huddle_plays = count(plays, |p| p.no_huddle);
    let third_down_attempts = count(plays, |p| p.down == Some(3));
    let third_down_conversions = count(plays, |p| p.down == Some(3) && p.is_first_down());
    let red_zone_plays = count(plays, Play::is_red_zone);
    let red_zone_successes = count(plays, |p| p.is_red_zone() && p.is_success());

    let total_yards = yards(plays, |_| true);
    let pass_yards = yards(plays, Play::is_pass);
    let run_yards = yards(plays, Play::is_run);

    let plays_f = f64::from(total);
    let games_f = f64::from(games);

    TeamAggregateRow {
        team_id,
        label,
        season,
        week: None,
        phase: None,

        games,
        plays: total,
        pass_plays,
        run_plays,
        sacks,
        scrambles: count(plays, Play::is_scramble),
        dropbacks,
        interceptions,
        first_downs,
        successes,
        stops: count(plays, Play::is_stop),
        explosive_plays,
        shotgun_plays,
        no_huddle_plays,
        third_down_attempts,
        third_down_conversions,
        red_zone_plays,
        red_zone_successes,
        pressure_proxy: sacks,

        total_yards,
        pass_yards,
        run_yards,

        sack_rate: safe_div(f64::from(sacks), f64::from(dropbacks)),
        success_rate: safe_div(f64::from(successes), plays_f),
        first_down_rate: safe_div(f64::from(first_downs), plays_f),
        yards_per_play: safe_div(total_yards as f64, plays_f),
        yards_per_pass: safe_div(pass_yards as f64, f64::from(pass_plays)),
        yards_per_rush: safe_div(run_yards as f64, f64::from(run_plays)),
        shotgun_rate: safe_div(f64::from(shotgun_plays), plays_f),
        no_huddle_rate: safe_div(f64::from(no_huddle_plays), plays_f),
        explosive_rate: safe_div(f64::from(explosive_plays), f64::from(pass_plays + run_plays)),
        interception_rate: safe_div(f64::from(interceptions), f64::from(dropbacks)),
        third_down_rate: safe_div(
            f64::from(third_down_conversions),
            f64::from(third_down_attempts),
        ),
        red_zone_success_rate: safe_div(f64::from(red_zone_successes), f64::from(red_zone_plays)),
        plays_per_game: safe_div(plays_f, games_f),
        yards_per_game: safe_div(total_yards as f64, games_f),
    }
}

/// Partitions plays by offense team (and week or phase) and summarizes each
/// bucket. Rows come back in order of each bucket's first play. Plays with
/// no offense team land in the `"unknown"` bucket rather than being dropped.
pub fn aggregate(plays: &[Play], group_by: GroupBy) -> Vec<TeamAggregateRow> {
    log::trace!("aggregate::aggregate by {}", group_by);

    let mut buckets: Vec<(GroupKey, Vec<&Play>)> = Vec::new();
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();
    for play in plays {
        let key = GroupKey::of(play, group_by);
        match positions.get(&key) {
            Some(&position) => buckets[position].1.push(play),
            None => {
                positions.insert(key.clone(), buckets.len());
                buckets.push((key, vec![play]));
            }
        }
    }

    let unknown: usize = buckets
        .iter()
        .filter(|(key, _)| key.team == UNKNOWN_TEAM)
        .map(|(_, bucket)| bucket.len())
        .sum();
    if unknown > 0 {
        log::warn!("{} plays without an offense team grouped as {}", unknown, UNKNOWN_TEAM);
    }

    let rows: Vec<TeamAggregateRow> = buckets
        .into_iter()
        .map(|(key, bucket)| {
            let label = key.label(group_by);
            let mut row = summarize(key.team, label, &bucket);
            row.week = key.week;
            row.phase = key.phase;
            row
        })
        .collect();
    log::debug!("{} plays aggregated into {} rows", plays.len(), rows.len());
    rows
}

/// League summary ordering: total yards descending, then team ascending.
pub fn sort_league_summary(rows: &mut [TeamAggregateRow]) {
    rows.sort_by(|a, b| {
        b.total_yards
            .cmp(&a.total_yards)
            .then_with(|| a.team_id.cmp(&b.team_id))
    });
}

/// Tabular view of aggregate rows for terminal display.
#[derive(Clone, Deref)]
pub struct TeamStatsDf(DataFrame);

impl TeamStatsDf {
    pub fn from_rows(rows: &[TeamAggregateRow]) -> Result<Self> {
        let column = |f: fn(&TeamAggregateRow) -> u32| rows.iter().map(f).collect::<Vec<u32>>();
        let rate = |f: fn(&TeamAggregateRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();

        let df = df!(
            "team" => rows.iter().map(|r| r.team_id.clone()).collect::<Vec<String>>(),
            "group" => rows.iter().map(|r| r.label.clone()).collect::<Vec<String>>(),
            "games" => column(|r| r.games),
            "plays" => column(|r| r.plays),
            "pass_plays" => column(|r| r.pass_plays),
            "run_plays" => column(|r| r.run_plays),
            "sacks" => column(|r| r.sacks),
            "total_yards" => rows.iter().map(|r| r.total_yards).collect::<Vec<i64>>(),
            "yards_per_play" => rate(|r| r.yards_per_play),
            "success_rate" => rate(|r| r.success_rate),
            "sack_rate" => rate(|r| r.sack_rate),
            "explosive_plays" => column(|r| r.explosive_plays),
            "third_down_rate" => rate(|r| r.third_down_rate),
            "red_zone_success_rate" => rate(|r| r.red_zone_success_rate),
            "shotgun_rate" => rate(|r| r.shotgun_rate),
            "no_huddle_rate" => rate(|r| r.no_huddle_rate)
        )?;
        log::debug!("{} team stat rows", df.height());
        Ok(TeamStatsDf(df))
    }
}
