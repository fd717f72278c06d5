use crate::core::track::{SCORE_TARGET_DEFAULT, SCORE_TARGET_MAX, SCORE_TARGET_MIN};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

pub const HORSE_LABEL_DEFAULT: &str = "H";

pub const HORSES_QUANTITY_MIN: i64 = 2;
pub const HORSES_QUANTITY_MAX: i64 = 20;
pub const HORSES_QUANTITY_DEFAULT: i64 = 5;

pub const GAME_TIMEOUT_MIN: Duration = Duration::from_secs(10);
pub const GAME_TIMEOUT_MAX: Duration = Duration::from_secs(60);
pub const GAME_TIMEOUT_DEFAULT: &str = "10s";

/// * `horse_label` - Single alphanumeric character, horses are labeled <horse_label>01,
/// <horse_label>02, ...
/// * `horses_quantity` - Number of horses in the race
/// * `score_target` - Score a horse must reach to win the race
/// * `game_timeout` - Duration after which the race ends without a winner, e.g. 15s or 1m
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RaceInput {
    pub horse_label: String,
    pub horses_quantity: i64,
    pub score_target: i64,
    pub game_timeout: String,
}

impl Default for RaceInput {
    fn default() -> Self {
        RaceInput {
            horse_label: HORSE_LABEL_DEFAULT.to_owned(),
            horses_quantity: HORSES_QUANTITY_DEFAULT,
            score_target: SCORE_TARGET_DEFAULT as i64,
            game_timeout: GAME_TIMEOUT_DEFAULT.to_owned(),
        }
    }
}

/// RacePars contains the race parameters after checking the input, i.e. all values are within
/// their valid ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RacePars {
    pub horse_label: String,
    pub horses_quantity: usize,
    pub score_target: i32,
    pub game_timeout: Duration,
}

impl Default for RacePars {
    fn default() -> Self {
        check_race_input(&RaceInput::default())
    }
}

impl From<&RacePars> for RaceInput {
    /// The conversion returns the raw input that checks to race_pars again (without warnings).
    fn from(race_pars: &RacePars) -> Self {
        RaceInput {
            horse_label: race_pars.horse_label.to_owned(),
            horses_quantity: race_pars.horses_quantity as i64,
            score_target: race_pars.score_target as i64,
            game_timeout: format!("{}ms", race_pars.game_timeout.as_millis()),
        }
    }
}

/// check_race_input assures that the inserted race input is within reasonable limits. Other than
/// a failing race, every invalid value is replaced by its default (and a warning is logged).
pub fn check_race_input(race_input: &RaceInput) -> RacePars {
    RacePars {
        horse_label: check_horse_label(&race_input.horse_label),
        horses_quantity: check_horses_quantity(race_input.horses_quantity),
        score_target: check_score_target(race_input.score_target),
        game_timeout: check_game_timeout(&race_input.game_timeout),
    }
}

/// check_horse_label returns the label if it consists of exactly one alphanumeric ASCII
/// character.
pub fn check_horse_label(horse_label: &str) -> String {
    let mut chars = horse_label.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => horse_label.to_owned(),
        _ => {
            warn!(
                "horse_label is {:?}, which is not a single alphanumeric character, using {:?}!",
                horse_label, HORSE_LABEL_DEFAULT
            );
            HORSE_LABEL_DEFAULT.to_owned()
        }
    }
}

pub fn check_horses_quantity(horses_quantity: i64) -> usize {
    if (HORSES_QUANTITY_MIN..=HORSES_QUANTITY_MAX).contains(&horses_quantity) {
        horses_quantity as usize
    } else {
        warn!(
            "horses_quantity is {}, which is not within the reasonable range of [{}, {}], using {}!",
            horses_quantity, HORSES_QUANTITY_MIN, HORSES_QUANTITY_MAX, HORSES_QUANTITY_DEFAULT
        );
        HORSES_QUANTITY_DEFAULT as usize
    }
}

pub fn check_score_target(score_target: i64) -> i32 {
    if (SCORE_TARGET_MIN as i64..=SCORE_TARGET_MAX as i64).contains(&score_target) {
        score_target as i32
    } else {
        warn!(
            "score_target is {}, which is not within the reasonable range of [{}, {}], using {}!",
            score_target, SCORE_TARGET_MIN, SCORE_TARGET_MAX, SCORE_TARGET_DEFAULT
        );
        SCORE_TARGET_DEFAULT
    }
}

/// check_game_timeout parses the timeout and returns it if it is within [GAME_TIMEOUT_MIN,
/// GAME_TIMEOUT_MAX]. Malformed or out-of-range timeouts are replaced by GAME_TIMEOUT_DEFAULT.
pub fn check_game_timeout(game_timeout: &str) -> Duration {
    match parse_duration(game_timeout) {
        Some(timeout) if (GAME_TIMEOUT_MIN..=GAME_TIMEOUT_MAX).contains(&timeout) => timeout,
        _ => {
            warn!(
                "game_timeout is {:?}, which is not within the reasonable range of [{:?}, {:?}], \
                using {}!",
                game_timeout, GAME_TIMEOUT_MIN, GAME_TIMEOUT_MAX, GAME_TIMEOUT_DEFAULT
            );
            default_game_timeout()
        }
    }
}

fn default_game_timeout() -> Duration {
    parse_duration(GAME_TIMEOUT_DEFAULT).unwrap_or(GAME_TIMEOUT_MIN)
}

/// parse_duration parses durations like "500ms", "15s", "1m" or "1m30s" (a sequence of decimal
/// numbers, each followed by one of the units h, m, s, ms). It returns None for malformed input.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let mut rest = input.trim();

    if rest.is_empty() {
        return None;
    }

    let mut total = Duration::ZERO;

    while !rest.is_empty() {
        // number part
        let len_number = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if len_number == 0 {
            return None;
        }
        let value: f64 = rest[..len_number].parse().ok()?;
        rest = &rest[len_number..];

        // unit part
        let len_unit = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let secs_per_unit = match &rest[..len_unit] {
            "h" => 3600.0,
            "m" => 60.0,
            "s" => 1.0,
            "ms" => 0.001,
            _ => return None,
        };
        rest = &rest[len_unit..];

        // a sum beyond Duration::MAX counts as malformed
        total = total.checked_add(Duration::try_from_secs_f64(value * secs_per_unit).ok()?)?;
    }

    Some(total)
}
