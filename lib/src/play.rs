use crate::classify::{self, compute_success};
use crate::play_type::PlayType;
use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

/// Plays gaining at least this many yards count as explosive.
pub const EXPLOSIVE_YARDS: i32 = 20;

/// Plays starting at or inside this distance from the goal line are red zone plays.
pub const RED_ZONE_YARDLINE: u8 = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, FromStr, Serialize, Deserialize)]
pub enum Phase {
    #[display("PRE")]
    #[serde(rename = "PRE")]
    Preseason,
    #[display("REG")]
    #[serde(rename = "REG")]
    Regular,
    #[display("POST")]
    #[serde(rename = "POST")]
    Postseason,
}

/// One classified offensive snap, keyed by `(game_id, play_id)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub game_id: String,
    pub play_id: u32,
    pub season: Option<u16>,
    pub week: Option<u8>,
    pub phase: Option<Phase>,
    pub description: String,
    pub down: Option<u8>,
    pub distance: Option<u16>,
    pub yardline_100: Option<u8>,
    pub result_yards: Option<i32>,
    pub offense_team: Option<String>,
    pub defense_team: Option<String>,
    pub play_type: PlayType,
    pub success: Option<bool>,
    pub shotgun: bool,
    pub no_huddle: bool,
    pub interception: bool,
}

/// Unclassified inputs for a single play.
#[derive(Clone, Debug, Default)]
pub struct PlayInput {
    pub game_id: String,
    pub play_id: u32,
    pub season: Option<u16>,
    pub week: Option<u8>,
    pub phase: Option<Phase>,
    pub description: String,
    pub down: Option<u8>,
    pub distance: Option<u16>,
    pub yardline_100: Option<u8>,
    pub result_yards: Option<i32>,
    pub offense_team: Option<String>,
    pub defense_team: Option<String>,
    pub shotgun: Option<bool>,
    pub no_huddle: Option<bool>,
}

impl Play {
    /// Classifies a play. Formation flags missing from the input fall back to
    /// the description.
    pub fn classify(input: PlayInput) -> Self {
        let play_type = classify::classify_play_type(&input.description);
        let success = compute_success(input.down, input.distance, input.result_yards);
        let shotgun = input
            .shotgun
            .unwrap_or_else(|| classify::is_shotgun(&input.description));
        let no_huddle = input
            .no_huddle
            .unwrap_or_else(|| classify::is_no_huddle(&input.description));
        let interception = classify::is_interception(&input.description);

        Play {
            game_id: input.game_id,
            play_id: input.play_id,
            season: input.season,
            week: input.week,
            phase: input.phase,
            description: input.description,
            down: input.down,
            distance: input.distance,
            yardline_100: input.yardline_100,
            result_yards: input.result_yards,
            offense_team: input.offense_team,
            defense_team: input.defense_team,
            play_type,
            success,
            shotgun,
            no_huddle,
            interception,
        }
    }

    pub fn key(&self) -> (&str, u32) {
        (&self.game_id, self.play_id)
    }

    pub fn is_pass(&self) -> bool {
        self.play_type.is_pass()
    }

    pub fn is_run(&self) -> bool {
        self.play_type.is_run()
    }

    pub fn is_sack(&self) -> bool {
        self.play_type.is_sack()
    }

    pub fn is_scramble(&self) -> bool {
        self.play_type.is_scramble()
    }

    pub fn is_interception(&self) -> bool {
        self.interception
    }

    /// Gained the line to gain. Unknown when distance or yards are missing.
    pub fn is_first_down(&self) -> bool {
        match (self.distance, self.result_yards) {
            (Some(distance), Some(yards)) => yards >= i32::from(distance),
            _ => false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    pub fn is_stop(&self) -> bool {
        self.success == Some(false)
    }

    pub fn is_explosive(&self) -> bool {
        (self.is_pass() || self.is_run()) && self.yards() >= EXPLOSIVE_YARDS
    }

    pub fn is_red_zone(&self) -> bool {
        self.yardline_100
            .is_some_and(|yardline| yardline <= RED_ZONE_YARDLINE)
    }

    pub fn yards(&self) -> i32 {
        self.result_yards.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(description: &str, down: u8, distance: u16, yards: i32) -> PlayInput {
        PlayInput {
            game_id: "2024_01_BAL_KC".to_string(),
            play_id: 1,
            description: description.to_string(),
            down: Some(down),
            distance: Some(distance),
            result_yards: Some(yards),
            offense_team: Some("KC".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_pass_play() {
        let play = Play::classify(input(
            "Mahomes pass short right to Kelce for 12 yards",
            1,
            10,
            12,
        ));
        assert_eq!(play.play_type, PlayType::PassShortRight);
        assert_eq!(play.success, Some(true));
        assert!(play.is_pass());
        assert!(play.is_first_down());
        assert!(!play.is_explosive());
        assert!(!play.shotgun);
    }

    #[test]
    fn test_success_requires_all_inputs() {
        let mut raw = input("I.Pacheco up the middle for 3 yards", 2, 10, 3);
        raw.distance = None;
        let play = Play::classify(raw);
        assert_eq!(play.success, None);
        assert!(!play.is_stop());
        assert!(!play.is_success());
        assert!(!play.is_first_down());
    }

    #[test]
    fn test_explosive_threshold() {
        let play = Play::classify(input("D.Henry left end for 19 yards", 1, 10, 19));
        assert!(!play.is_explosive());
        let play = Play::classify(input("D.Henry left end for 20 yards", 1, 10, 20));
        assert!(play.is_explosive());
        let play = Play::classify(input("P.Mahomes pass deep left for 20 yards", 1, 10, 20));
        assert!(play.is_explosive());
        // Penalty yardage is never explosive
        let play = Play::classify(input("PENALTY on BAL, Defensive Pass Interference", 1, 10, 35));
        assert!(!play.is_explosive());
    }

    #[test]
    fn test_formation_flags() {
        let play = Play::classify(input("(No Huddle, Shotgun) P.Mahomes pass short left", 1, 10, 0));
        assert!(play.shotgun);
        assert!(play.no_huddle);

        let mut raw = input("(Shotgun) P.Mahomes pass short left", 1, 10, 0);
        raw.shotgun = Some(false);
        assert!(!Play::classify(raw).shotgun);
    }

    #[test]
    fn test_red_zone() {
        let mut raw = input("I.Pacheco up the middle for 2 yards", 1, 10, 2);
        raw.yardline_100 = Some(20);
        assert!(Play::classify(raw.clone()).is_red_zone());
        raw.yardline_100 = Some(21);
        assert!(!Play::classify(raw.clone()).is_red_zone());
        raw.yardline_100 = None;
        assert!(!Play::classify(raw).is_red_zone());
    }

    #[test]
    fn test_phase_tags() {
        assert_eq!(Phase::Regular.to_string(), "REG");
        assert_eq!("POST".parse::<Phase>().ok(), Some(Phase::Postseason));
        assert!("reg".parse::<Phase>().is_err());
    }
}
