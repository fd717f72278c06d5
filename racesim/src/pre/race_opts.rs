use crate::core::track::SCORE_TARGET_DEFAULT;
use crate::pre::check_race_input::{
    RaceInput, GAME_TIMEOUT_DEFAULT, HORSES_QUANTITY_DEFAULT, HORSE_LABEL_DEFAULT,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "horserace",
    about = "A horse race on an ASCII track, every horse running in its own thread"
)]
pub struct RaceOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging (written to stderr)
    #[arg(short, long)]
    pub debug: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set the horse label, a single alphanumeric character (horses are labeled H01, H02, ...)
    #[arg(short = 'l', long, default_value = HORSE_LABEL_DEFAULT)]
    pub horse_label: String,

    /// Set number of horses, should be in the range [2, 20]
    #[arg(
        short = 'q',
        long,
        default_value_t = HORSES_QUANTITY_DEFAULT,
        allow_negative_numbers = true
    )]
    pub horses_quantity: i64,

    /// Set score a horse must reach to win, should be in the range [10, 100]
    #[arg(
        short,
        long,
        default_value_t = SCORE_TARGET_DEFAULT as i64,
        allow_negative_numbers = true
    )]
    pub score_target: i64,

    /// Set race timeout, e.g. 15s or 1m, should be in the range [10s, 60s]
    #[arg(short, long, default_value = GAME_TIMEOUT_DEFAULT)]
    pub game_timeout: String,

    /// Set path to a JSON parameter file (replaces the race options above)
    #[arg(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set number of races (more than one race is simulated without display)
    #[arg(short, long, default_value_t = 1)]
    pub no_races: u32,
}

impl RaceOpts {
    /// The method returns the race input given on the command line.
    pub fn race_input(&self) -> RaceInput {
        RaceInput {
            horse_label: self.horse_label.to_owned(),
            horses_quantity: self.horses_quantity,
            score_target: self.score_target,
            game_timeout: self.game_timeout.to_owned(),
        }
    }
}
