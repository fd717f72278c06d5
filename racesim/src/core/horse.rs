use crate::post::race_outcome::winner_announcement;
use std::sync::atomic::{AtomicI32, Ordering};

/// * `label` - Display label of the horse, e.g. H01 (fixed once the horse is created)
/// * `score` - Current score of the horse, i.e. its progress on the track (only changed through
/// atomic operations such that it can be read by the display without any lock)
#[derive(Debug)]
pub struct Horse {
    label: String,
    score: AtomicI32,
}

impl Horse {
    pub fn new(label: &str) -> Horse {
        Horse::with_score(label, 0)
    }

    /// with_score creates a horse that does not start from zero, e.g. to set up a race that is
    /// already in progress.
    pub fn with_score(label: &str, score: i32) -> Horse {
        Horse {
            label: label.to_owned(),
            score: AtomicI32::new(score),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The method returns the current score of the horse.
    pub fn current_score(&self) -> i32 {
        self.score.load(Ordering::SeqCst)
    }

    /// The method adds delta to the score of the horse and returns the updated score.
    pub fn advance_by(&self, delta: i32) -> i32 {
        self.score.fetch_add(delta, Ordering::SeqCst) + delta
    }

    /// The method sets a negative score back to zero (positive scores are left untouched). A
    /// concurrent update in between is not overwritten.
    pub fn reset_negative_score(&self) {
        let _ = self
            .score
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |score| {
                if score < 0 {
                    Some(0)
                } else {
                    None
                }
            });
    }

    /// The method returns the greeting line for the champion horse.
    pub fn winner_message(&self) -> String {
        winner_announcement(&self.label, self.current_score())
    }
}
