use crate::post::race_outcome::RaceOutcome;
use std::collections::BTreeMap;
use std::fmt::Write;

/// RaceSummary contains the aggregated outcomes of several races for post-processing.
///
/// * `no_races` - Number of simulated races
/// * `wins` - Number of wins per horse label (sorted by label)
/// * `no_timeouts` - Number of races without a winner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceSummary {
    pub no_races: u32,
    pub wins: BTreeMap<String, u32>,
    pub no_timeouts: u32,
}

impl RaceSummary {
    pub fn from_outcomes(outcomes: &[RaceOutcome]) -> RaceSummary {
        let mut summary = RaceSummary::default();

        for outcome in outcomes.iter() {
            summary.add(outcome);
        }

        summary
    }

    pub fn add(&mut self, outcome: &RaceOutcome) {
        self.no_races += 1;

        match outcome {
            RaceOutcome::Winner { label, .. } => {
                *self.wins.entry(label.to_owned()).or_insert(0) += 1;
            }
            RaceOutcome::TimedOut => self.no_timeouts += 1,
        }
    }

    /// The method returns the summary as text: one line per winning horse (label, wins, share of
    /// all races) followed by the timeouts.
    pub fn format_summary(&self) -> String {
        let mut tmp_string = String::new();
        let no_races = self.no_races.max(1) as f64;

        writeln!(&mut tmp_string, "horse, wins, share").unwrap();

        for (label, wins) in self.wins.iter() {
            writeln!(
                &mut tmp_string,
                "{:>5}, {:4}, {:5.1}%",
                label,
                wins,
                *wins as f64 / no_races * 100.0
            )
            .unwrap();
        }

        write!(
            &mut tmp_string,
            "{:>5}, {:4}, {:5.1}%",
            "-",
            self.no_timeouts,
            self.no_timeouts as f64 / no_races * 100.0
        )
        .unwrap();

        tmp_string
    }

    /// print_summary prints the summary to the console output.
    pub fn print_summary(&self) {
        println!("RESULT: Wins after {} races", self.no_races);
        println!("{}", self.format_summary());
    }
}
