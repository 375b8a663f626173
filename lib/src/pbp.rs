use crate::{
    play::{Phase, Play, PlayInput},
    Result,
};
use derive_deref::Deref;
use polars::{prelude::*, sql::SQLContext};
use std::path::Path;

/// nflverse play-by-play frame.
#[derive(Clone, Deref)]
pub struct PbpDf(DataFrame);

impl PbpDf {
    pub fn new(df: DataFrame) -> Self {
        PbpDf(df)
    }

    pub fn load(season: u16) -> Result<Self> {
        Self::load_file(format!("data/pbp_{}.parquet", season))
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let df = crate::load_parquet(path)?;
        log::info!("Loaded {} plays", df.height());
        Ok(PbpDf(df))
    }

    pub fn filter(self, filter: Expr) -> Result<Self> {
        let df = self.0.lazy().filter(filter).collect()?;
        Ok(PbpDf(df))
    }

    /// Runs a SQL query against the frame, registered as the `plays` table.
    pub fn filter_sql(self, query: &str) -> Result<Self> {
        let mut ctx = SQLContext::new();
        ctx.register("plays", self.0.lazy());
        let df = ctx.execute(query)?.collect()?;
        Ok(PbpDf(df))
    }

    /// Classifies every row. Only `desc` is required; any other missing
    /// column reads as unknown.
    pub fn plays(&self) -> Result<Vec<Play>> {
        log::trace!("pbp::plays");
        let df = &self.0;
        let height = df.height();

        let descriptions = str_values(df, "desc")?;
        let game_ids = optional(df, "game_id", str_values)?;
        let offense = optional(df, "posteam", str_values)?;
        let defense = optional(df, "defteam", str_values)?;
        let season_types = optional(df, "season_type", str_values)?;
        let play_ids = optional(df, "play_id", f64_values)?;
        let seasons = optional(df, "season", f64_values)?;
        let weeks = optional(df, "week", f64_values)?;
        let downs = optional(df, "down", f64_values)?;
        let distances = optional(df, "ydstogo", f64_values)?;
        let yards = optional(df, "yards_gained", f64_values)?;
        let yardlines = optional(df, "yardline_100", f64_values)?;
        let shotgun = optional(df, "shotgun", f64_values)?;
        let no_huddle = optional(df, "no_huddle", f64_values)?;

        let plays: Vec<Play> = (0..height)
            .map(|i| {
                Play::classify(PlayInput {
                    game_id: game_ids[i].clone().unwrap_or_default(),
                    play_id: play_ids[i].map_or(i as u32, |id| id as u32),
                    season: seasons[i].map(|v| v as u16),
                    week: weeks[i].map(|v| v as u8),
                    phase: season_types[i].as_deref().and_then(|v| v.parse::<Phase>().ok()),
                    description: descriptions[i].clone().unwrap_or_default(),
                    down: downs[i].map(|v| v as u8),
                    distance: distances[i].map(|v| v as u16),
                    yardline_100: yardlines[i].map(|v| v as u8),
                    result_yards: yards[i].map(|v| v as i32),
                    offense_team: offense[i].clone(),
                    defense_team: defense[i].clone(),
                    shotgun: shotgun[i].map(|v| v != 0.0),
                    no_huddle: no_huddle[i].map(|v| v != 0.0),
                })
            })
            .collect();

        log::debug!("{} plays classified", plays.len());
        Ok(plays)
    }
}

fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}

// Reads a column that may be absent, yielding all-`None` when it is.
fn optional<T: Clone>(
    df: &DataFrame,
    name: &str,
    read: fn(&DataFrame, &str) -> Result<Vec<Option<T>>>,
) -> Result<Vec<Option<T>>> {
    if df.column(name).is_ok() {
        read(df, name)
    } else {
        log::debug!("Column {} missing, treating as unknown", name);
        Ok(vec![None; df.height()])
    }
}

#[derive(Clone, Default)]
pub struct PbpFilter {
    filter_expr: Option<Expr>,
}

impl PbpFilter {
    pub fn new() -> Self {
        Self { filter_expr: None }
    }

    pub fn season(mut self, season: u16) -> Self {
        let expr = col("season").eq(lit(season as u32));
        self.extend_filter(expr)
    }

    // Matches the offense
    pub fn team(mut self, team_name: &str) -> Self {
        let expr = col("posteam").eq(lit(team_name));
        self.extend_filter(expr)
    }

    pub fn game(mut self, game_id: &str) -> Self {
        let expr = col("game_id").eq(lit(game_id));
        self.extend_filter(expr)
    }

    pub fn week(mut self, week: u8) -> Self {
        let expr = col("week").eq(lit(week as u32));
        self.extend_filter(expr)
    }

    pub fn week_range(mut self, start: u8, end: u8) -> Self {
        let expr = col("week").is_between(start as u32, end as u32, ClosedInterval::Both);
        self.extend_filter(expr)
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        let expr = col("season_type").eq(lit(phase.to_string()));
        self.extend_filter(expr)
    }

    /// Keeps snaps nflverse tags as passes or runs, dropping special teams,
    /// timeouts and administrative rows.
    pub fn scrimmage(mut self) -> Self {
        let expr = col("play_type")
            .eq(lit("pass"))
            .or(col("play_type").eq(lit("run")));
        self.extend_filter(expr)
    }

    // Combines the current filter with a new one using AND logic
    fn extend_filter(&mut self, new_expr: Expr) -> Self {
        self.filter_expr = match self.filter_expr.take() {
            Some(existing_expr) => Some(existing_expr.and(new_expr)),
            None => Some(new_expr),
        };
        self.clone()
    }

    pub fn build(self) -> Expr {
        self.filter_expr.unwrap_or_else(|| lit(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play_type::PlayType;

    fn sample() -> PbpDf {
        let df = df!(
            "game_id" => ["2024_01_BAL_KC", "2024_01_BAL_KC", "2024_01_BAL_KC", "2024_19_HOU_KC"],
            "play_id" => [40.0, 55.0, 76.0, 312.0],
            "season" => [2024i32, 2024, 2024, 2024],
            "week" => [1i32, 1, 1, 19],
            "season_type" => ["REG", "REG", "REG", "POST"],
            "posteam" => [Some("BAL"), Some("KC"), None, Some("KC")],
            "play_type" => [Some("kickoff"), Some("pass"), Some("run"), Some("pass")],
            "desc" => [
                "H.Butker kicks off 65 yards from KC 35 to end zone, Touchback.",
                "(Shotgun) P.Mahomes pass short right to T.Kelce for 12 yards",
                "I.Pacheco up the middle for 3 yards",
                "P.Mahomes pass deep left to X.Worthy for 25 yards",
            ],
            "down" => [None, Some(1.0), Some(2.0), Some(1.0)],
            "ydstogo" => [0.0, 10.0, 10.0, 10.0],
            "yards_gained" => [Some(0.0), Some(12.0), Some(3.0), Some(25.0)],
            "shotgun" => [0.0, 1.0, 0.0, 0.0]
        )
        .unwrap();
        PbpDf::new(df)
    }

    #[test]
    fn test_plays_from_frame() {
        let plays = sample().plays().unwrap();
        assert_eq!(plays.len(), 4);

        assert_eq!(plays[0].play_type, PlayType::Kickoff);
        assert_eq!(plays[0].success, None);
        assert_eq!(plays[0].play_id, 40);

        assert_eq!(plays[1].play_type, PlayType::PassShortRight);
        assert_eq!(plays[1].success, Some(true));
        assert_eq!(plays[1].offense_team.as_deref(), Some("KC"));
        assert_eq!(plays[1].phase, Some(Phase::Regular));
        assert_eq!(plays[1].season, Some(2024));
        assert!(plays[1].shotgun);
        assert!(!plays[1].no_huddle);

        assert_eq!(plays[2].play_type, PlayType::RushMiddle);
        assert_eq!(plays[2].success, Some(false));
        assert_eq!(plays[2].offense_team, None);
        assert_eq!(plays[2].yardline_100, None);

        assert_eq!(plays[3].play_type, PlayType::PassDeepLeft);
        assert_eq!(plays[3].phase, Some(Phase::Postseason));
        assert_eq!(plays[3].week, Some(19));
        assert!(plays[3].is_explosive());
    }

    fn filtered(filter: PbpFilter) -> Vec<u32> {
        sample()
            .filter(filter.build())
            .unwrap()
            .plays()
            .unwrap()
            .iter()
            .map(|play| play.play_id)
            .collect()
    }

    #[test]
    fn test_filter() {
        let test_cases = vec![
            (PbpFilter::new(), vec![40, 55, 76, 312]),
            (PbpFilter::new().season(2024).team("KC").scrimmage(), vec![55, 312]),
            (PbpFilter::new().season(2023), vec![]),
            (PbpFilter::new().week(19), vec![312]),
            (PbpFilter::new().week(2), vec![]),
            (PbpFilter::new().week_range(1, 18), vec![40, 55, 76]),
            (PbpFilter::new().week_range(18, 22).team("KC"), vec![312]),
            (PbpFilter::new().phase(Phase::Postseason), vec![312]),
            (PbpFilter::new().phase(Phase::Regular).team("KC"), vec![55]),
            (PbpFilter::new().phase(Phase::Preseason), vec![]),
            (PbpFilter::new().game("2024_01_BAL_KC").scrimmage(), vec![55, 76]),
        ];

        for (filter, expected) in test_cases {
            assert_eq!(filtered(filter), expected);
        }
    }

    #[test]
    fn test_load_missing_season() {
        assert!(matches!(PbpDf::load(1900), Err(crate::Error::Io(_))));
        assert!(matches!(
            PbpDf::load_file("data/no_such_file.parquet"),
            Err(crate::Error::Io(_))
        ));
    }

    #[test]
    fn test_filter_sql() {
        let pbp = sample()
            .filter_sql("SELECT * FROM plays WHERE play_type = 'run'")
            .unwrap();
        assert_eq!(pbp.height(), 1);
    }
}
