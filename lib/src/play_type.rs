use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

/// Canonical play tag assigned by [`crate::classify::classify_play_type`].
///
/// The tag vocabulary is closed: `Display` renders the kebab-case tag
/// (`pass-short-right`, `rush-left-end`, ...) and `FromStr` accepts only
/// those tags.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, FromStr, Serialize, Deserialize,
)]
#[display(style = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PlayType {
    Punt,
    KickoffOnside,
    Kickoff,
    FieldGoal,
    ExtraPoint,
    TwoPointAttempt,
    QbSpike,
    QbKneel,

    PenaltyOffense,
    PenaltyDefense,
    Penalty,

    PassSack,
    QbScramble,

    PassShortLeft,
    PassShortMiddle,
    PassShortRight,
    PassDeepLeft,
    PassDeepMiddle,
    PassDeepRight,
    PassScreenLeft,
    PassScreenMiddle,
    PassScreenRight,

    RushLeftEnd,
    RushLeftTackle,
    RushLeftGuard,
    RushRightEnd,
    RushRightTackle,
    RushRightGuard,
    RushMiddle,
    RushRight,
    RushLeft,
    Rush,

    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassDepth {
    Short,
    Deep,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Middle,
    Right,
}

impl PlayType {
    pub const ALL: [PlayType; 33] = [
        PlayType::Punt,
        PlayType::KickoffOnside,
        PlayType::Kickoff,
        PlayType::FieldGoal,
        PlayType::ExtraPoint,
        PlayType::TwoPointAttempt,
        PlayType::QbSpike,
        PlayType::QbKneel,
        PlayType::PenaltyOffense,
        PlayType::PenaltyDefense,
        PlayType::Penalty,
        PlayType::PassSack,
        PlayType::QbScramble,
        PlayType::PassShortLeft,
        PlayType::PassShortMiddle,
        PlayType::PassShortRight,
        PlayType::PassDeepLeft,
        PlayType::PassDeepMiddle,
        PlayType::PassDeepRight,
        PlayType::PassScreenLeft,
        PlayType::PassScreenMiddle,
        PlayType::PassScreenRight,
        PlayType::RushLeftEnd,
        PlayType::RushLeftTackle,
        PlayType::RushLeftGuard,
        PlayType::RushRightEnd,
        PlayType::RushRightTackle,
        PlayType::RushRightGuard,
        PlayType::RushMiddle,
        PlayType::RushRight,
        PlayType::RushLeft,
        PlayType::Rush,
        PlayType::Other,
    ];

    pub fn pass(depth: PassDepth, direction: Direction) -> Self {
        match (depth, direction) {
            (PassDepth::Short, Direction::Left) => PlayType::PassShortLeft,
            (PassDepth::Short, Direction::Middle) => PlayType::PassShortMiddle,
            (PassDepth::Short, Direction::Right) => PlayType::PassShortRight,
            (PassDepth::Deep, Direction::Left) => PlayType::PassDeepLeft,
            (PassDepth::Deep, Direction::Middle) => PlayType::PassDeepMiddle,
            (PassDepth::Deep, Direction::Right) => PlayType::PassDeepRight,
        }
    }

    pub fn screen(direction: Direction) -> Self {
        match direction {
            Direction::Left => PlayType::PassScreenLeft,
            Direction::Middle => PlayType::PassScreenMiddle,
            Direction::Right => PlayType::PassScreenRight,
        }
    }

    /// Completed or attempted forward passes. Sacks and scrambles are not passes.
    pub fn is_pass(self) -> bool {
        matches!(
            self,
            PlayType::PassShortLeft
                | PlayType::PassShortMiddle
                | PlayType::PassShortRight
                | PlayType::PassDeepLeft
                | PlayType::PassDeepMiddle
                | PlayType::PassDeepRight
                | PlayType::PassScreenLeft
                | PlayType::PassScreenMiddle
                | PlayType::PassScreenRight
        )
    }

    /// Designed runs. Quarterback scrambles are counted separately.
    pub fn is_run(self) -> bool {
        matches!(
            self,
            PlayType::RushLeftEnd
                | PlayType::RushLeftTackle
                | PlayType::RushLeftGuard
                | PlayType::RushRightEnd
                | PlayType::RushRightTackle
                | PlayType::RushRightGuard
                | PlayType::RushMiddle
                | PlayType::RushRight
                | PlayType::RushLeft
                | PlayType::Rush
        )
    }

    pub fn is_sack(self) -> bool {
        self == PlayType::PassSack
    }

    pub fn is_scramble(self) -> bool {
        self == PlayType::QbScramble
    }

    pub fn is_penalty(self) -> bool {
        matches!(
            self,
            PlayType::PenaltyOffense | PlayType::PenaltyDefense | PlayType::Penalty
        )
    }

    pub fn is_special_teams(self) -> bool {
        matches!(
            self,
            PlayType::Punt
                | PlayType::KickoffOnside
                | PlayType::Kickoff
                | PlayType::FieldGoal
                | PlayType::ExtraPoint
                | PlayType::TwoPointAttempt
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tags_are_kebab_case() {
        let test_cases = vec![
            (PlayType::Punt, "punt"),
            (PlayType::KickoffOnside, "kickoff-onside"),
            (PlayType::FieldGoal, "field-goal"),
            (PlayType::TwoPointAttempt, "two-point-attempt"),
            (PlayType::QbSpike, "qb-spike"),
            (PlayType::PenaltyDefense, "penalty-defense"),
            (PlayType::PassSack, "pass-sack"),
            (PlayType::PassShortRight, "pass-short-right"),
            (PlayType::PassScreenMiddle, "pass-screen-middle"),
            (PlayType::RushLeftGuard, "rush-left-guard"),
            (PlayType::Other, "other"),
        ];

        for (play_type, tag) in test_cases {
            assert_eq!(play_type.to_string(), tag);
            assert_eq!(tag.parse::<PlayType>().ok(), Some(play_type));
        }
    }

    #[test]
    fn test_vocabulary_is_closed_and_unique() {
        let tags: HashSet<String> = PlayType::ALL.iter().map(|t| t.to_string()).collect();
        assert_eq!(tags.len(), PlayType::ALL.len());
        assert!("pass-medium-left".parse::<PlayType>().is_err());
        assert!("Pass-Short-Left".parse::<PlayType>().is_err());
    }

    #[test]
    fn test_serde_uses_tag() {
        let json = serde_json::to_string(&PlayType::RushRightTackle).unwrap();
        assert_eq!(json, "\"rush-right-tackle\"");
    }

    #[test]
    fn test_families_are_disjoint() {
        for play_type in PlayType::ALL {
            let families = [
                play_type.is_pass(),
                play_type.is_run(),
                play_type.is_sack(),
                play_type.is_scramble(),
                play_type.is_penalty(),
                play_type.is_special_teams(),
            ];
            assert!(
                families.iter().filter(|f| **f).count() <= 1,
                "{} is in more than one family",
                play_type
            );
        }
    }
}
