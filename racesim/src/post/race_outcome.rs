use std::time::Duration;

/// RaceOutcome is the result of a single race, which is either decided by the first horse reaching
/// the score target or by the timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome {
    Winner { label: String, score: i32 },
    TimedOut,
}

impl RaceOutcome {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, RaceOutcome::TimedOut)
    }

    pub fn winner_label(&self) -> Option<&str> {
        match self {
            RaceOutcome::Winner { label, .. } => Some(label),
            RaceOutcome::TimedOut => None,
        }
    }

    /// The method returns the line that announces the outcome at the end of the race.
    pub fn announcement(&self, game_timeout: Duration) -> String {
        match self {
            RaceOutcome::Winner { label, score } => winner_announcement(label, *score),
            RaceOutcome::TimedOut => format!(
                "The horses are tired! No winner after {:?}",
                game_timeout
            ),
        }
    }
}

/// winner_announcement returns the greeting line for the champion horse.
pub fn winner_announcement(label: &str, score: i32) -> String {
    format!("The horse winner is: {} - Score {}", label, score)
}
