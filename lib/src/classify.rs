//! Rule-based play classification over free-text play descriptions.
//!
//! Rules are plain substring checks on the lower-cased description and are
//! applied in a fixed priority order; the first match wins.

use crate::play_type::{Direction, PassDepth, PlayType};

/// Maps a play description to its canonical [`PlayType`]. Never fails;
/// descriptions matching no rule are [`PlayType::Other`].
pub fn classify_play_type(description: &str) -> PlayType {
    let desc = description.to_lowercase();

    match desc.as_str() {
        // Special teams and clock plays
        s if s.contains("punt") => PlayType::Punt,
        s if s.contains("onside kick") => PlayType::KickoffOnside,
        s if s.contains("kicks off") || s.contains("kickoff") => PlayType::Kickoff,
        s if s.contains("field goal") => PlayType::FieldGoal,
        s if s.contains("extra point") => PlayType::ExtraPoint,
        s if s.contains("two-point") || s.contains("two pt") => PlayType::TwoPointAttempt,
        s if s.contains("spike") => PlayType::QbSpike,
        s if s.contains("kneel") => PlayType::QbKneel,

        s if s.contains("penalty on") => classify_penalty(s),

        s if s.contains("sack") => PlayType::PassSack,
        s if s.contains("scramble") => PlayType::QbScramble,

        s if s.contains("pass") => classify_pass(s),

        s => classify_rush(s),
    }
}

fn classify_penalty(desc: &str) -> PlayType {
    if desc.contains("offensive") || desc.contains("offense") {
        PlayType::PenaltyOffense
    } else if desc.contains("defensive") || desc.contains("defense") {
        PlayType::PenaltyDefense
    } else {
        PlayType::Penalty
    }
}

fn classify_pass(desc: &str) -> PlayType {
    let direction = if desc.contains("left") {
        Direction::Left
    } else if desc.contains("right") {
        Direction::Right
    } else {
        Direction::Middle
    };

    if desc.contains("screen") {
        return PlayType::screen(direction);
    }

    let depth = if desc.contains("deep") {
        PassDepth::Deep
    } else {
        PassDepth::Short
    };
    PlayType::pass(depth, direction)
}

// The bare "right"/"left" checks run before the generic "rush" check, so
// `PlayType::Rush` is only reached by descriptions naming no direction.
fn classify_rush(desc: &str) -> PlayType {
    match desc {
        s if s.contains("left end") => PlayType::RushLeftEnd,
        s if s.contains("left tackle") => PlayType::RushLeftTackle,
        s if s.contains("left guard") => PlayType::RushLeftGuard,
        s if s.contains("right end") => PlayType::RushRightEnd,
        s if s.contains("right tackle") => PlayType::RushRightTackle,
        s if s.contains("right guard") => PlayType::RushRightGuard,
        s if s.contains("middle") => PlayType::RushMiddle,
        s if s.contains("right") => PlayType::RushRight,
        s if s.contains("left") => PlayType::RushLeft,
        s if s.contains("rush") => PlayType::Rush,
        _ => PlayType::Other,
    }
}

/// Down-dependent success: on 1st down the play must gain 40% of the
/// distance, on 2nd down 60%, on 3rd and 4th down all of it.
///
/// Returns `None` when any input is unknown or the down is not 1-4.
pub fn compute_success(
    down: Option<u8>,
    distance: Option<u16>,
    yards_gained: Option<i32>,
) -> Option<bool> {
    let (down, distance, yards_gained) = (down?, distance?, yards_gained?);

    let fraction = match down {
        1 => 0.4,
        2 => 0.6,
        3 | 4 => 1.0,
        _ => return None,
    };

    Some(f64::from(yards_gained) >= fraction * f64::from(distance))
}

pub fn is_shotgun(description: &str) -> bool {
    description.to_lowercase().contains("shotgun")
}

pub fn is_no_huddle(description: &str) -> bool {
    description.to_lowercase().contains("no huddle")
}

pub fn is_interception(description: &str) -> bool {
    description.to_lowercase().contains("intercepted")
}
