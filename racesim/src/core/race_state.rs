use crate::core::horse::Horse;
use crate::core::latch::OneShotLatch;
use crate::core::track::normalize_score_target;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// RaceState contains everything that is shared between the race workers, the display and the
/// coordinator of a single race. It is handed around as Arc<RaceState>, such that several races can
/// run independently within the same process.
///
/// * `horses` - Participating horses in a fixed order (the lock is only required to replace the
/// whole list, scores are updated atomically)
/// * `score_target` - Score that must be reached to win the race
/// * `winner` - Horse that reached the score target first (set at most once)
/// * `outcome_latch` - Latch that decides the race exactly once, either by a winner or by timeout
/// * `race_over` - Flag that is observed by all workers to stop
#[derive(Debug)]
pub struct RaceState {
    horses: RwLock<Vec<Arc<Horse>>>,
    score_target: i32,
    winner: Mutex<Option<Arc<Horse>>>,
    outcome_latch: OneShotLatch,
    race_over: AtomicBool,
}

impl RaceState {
    pub fn new(score_target: i32) -> RaceState {
        RaceState {
            horses: RwLock::new(Vec::new()),
            score_target: normalize_score_target(score_target),
            winner: Mutex::new(None),
            outcome_latch: OneShotLatch::new(),
            race_over: AtomicBool::new(false),
        }
    }

    /// with_horses creates a race state for an already existing list of horses.
    pub fn with_horses(horses: Vec<Arc<Horse>>, score_target: i32) -> RaceState {
        let race_state = RaceState::new(score_target);
        race_state.replace_horses(horses);
        race_state
    }

    /// The method creates horses_quantity horses labeled <horse_label>01, <horse_label>02, ... and
    /// replaces the current list of horses with them.
    pub fn load_horses(&self, horse_label: &str, horses_quantity: usize) {
        let horses = (1..=horses_quantity)
            .map(|idx| Arc::new(Horse::new(&format!("{}{:02}", horse_label, idx))))
            .collect();

        self.replace_horses(horses);
    }

    pub fn replace_horses(&self, horses: Vec<Arc<Horse>>) {
        *self.horses.write() = horses;
    }

    /// The method returns a snapshot of the horse list (the horses themselves are shared, i.e.
    /// their scores keep changing).
    pub fn horses(&self) -> Vec<Arc<Horse>> {
        self.horses.read().clone()
    }

    pub fn score_target(&self) -> i32 {
        self.score_target
    }

    pub fn is_race_over(&self) -> bool {
        self.race_over.load(Ordering::SeqCst)
    }

    /// The method tries to declare horse the winner of the race. Only the first call within a race
    /// succeeds (returns true), all later or concurrent calls are no-ops. A race that was already
    /// concluded by timeout cannot get a winner anymore.
    pub fn declare_winner(&self, horse: &Arc<Horse>) -> bool {
        self.outcome_latch.trigger(|| {
            *self.winner.lock() = Some(Arc::clone(horse));
            self.race_over.store(true, Ordering::SeqCst);
        })
    }

    /// The method concludes the race without a winner (timeout). It returns false if a winner was
    /// declared before, in which case the race outcome stays unchanged.
    pub fn conclude_without_winner(&self) -> bool {
        // if the latch was triggered by a winner before, race_over is already set as well
        self.outcome_latch.trigger(|| {
            self.race_over.store(true, Ordering::SeqCst);
        })
    }

    pub fn winner(&self) -> Option<Arc<Horse>> {
        self.winner.lock().clone()
    }
}
