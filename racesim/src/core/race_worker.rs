use crate::core::horse::Horse;
use crate::core::race_state::RaceState;
use crossbeam::sync::WaitGroup;
use flume::{Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Stride determines by how much a horse advances per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stride {
    Fixed(i32),
    Uniform { min: i32, max: i32 },
}

impl Stride {
    /// The method returns the score delta for the next tick (always at least one).
    pub fn sample(&self) -> i32 {
        let delta = match *self {
            Stride::Fixed(delta) => delta,
            Stride::Uniform { min, max } if min < max => rand::thread_rng().gen_range(min..=max),
            Stride::Uniform { min, .. } => min,
        };

        delta.max(1)
    }
}

/// WorkerStep is the result of a single tick of a race worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStep {
    Continue,
    ReachedTarget { declared: bool },
    GameOver,
}

/// WorkerExit is the final state of a race worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    FinishedByScore,
    FinishedByStop,
    FinishedByGameOver,
}

/// step executes one tick for a horse:
/// 1. Stop without advancing if the race is already over.
/// 2. Advance the horse by one stride.
/// 3. If the score target is reached, try to declare the horse the winner (only the first horse
/// within a race succeeds).
pub fn step(horse: &Arc<Horse>, race_state: &RaceState, stride: &Stride) -> WorkerStep {
    if race_state.is_race_over() {
        return WorkerStep::GameOver;
    }

    let score = horse.advance_by(stride.sample());

    if score >= race_state.score_target() {
        return WorkerStep::ReachedTarget {
            declared: race_state.declare_winner(horse),
        };
    }

    WorkerStep::Continue
}

/// StopSignal tells all race workers of a race to stop. Stopping disconnects the channel, which
/// wakes up every waiting worker. Stopping more than once is a no-op.
#[derive(Debug)]
pub struct StopSignal {
    tx: Mutex<Option<Sender<()>>>,
}

impl StopSignal {
    pub fn new() -> (StopSignal, Receiver<()>) {
        let (tx, rx) = flume::unbounded();
        (
            StopSignal {
                tx: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    pub fn stop(&self) {
        if self.tx.lock().take().is_some() {
            debug!("Stop signal sent to all race workers");
        }
    }
}

/// * `horse` - Horse that is driven by the worker
/// * `race_state` - Shared state of the race
/// * `stop_rx` - Receiving end of the stop signal
/// * `done_tx` - Completion channel towards the coordinator (bounded, sending never blocks)
/// * `wait_group` - Released when the worker returns, on any exit path
/// * `tick_interval` - Time between two ticks
/// * `stride` - Score delta per tick
#[derive(Debug)]
pub struct RaceWorker {
    pub horse: Arc<Horse>,
    pub race_state: Arc<RaceState>,
    pub stop_rx: Receiver<()>,
    pub done_tx: Sender<()>,
    pub wait_group: WaitGroup,
    pub tick_interval: Duration,
    pub stride: Stride,
}

impl RaceWorker {
    /// The method runs the control loop of the horse until it reached the score target, the race
    /// is over, or the stop signal arrives. The wait group is released when the worker is dropped
    /// at the end of the method.
    pub fn run(self) -> WorkerExit {
        self.horse.reset_negative_score();

        let exit = loop {
            match step(&self.horse, &self.race_state, &self.stride) {
                WorkerStep::GameOver => break WorkerExit::FinishedByGameOver,
                WorkerStep::ReachedTarget { declared } => {
                    if declared {
                        info!(
                            horse = self.horse.label(),
                            score = self.horse.current_score(),
                            "Winner declared"
                        );
                        self.signal_completion();
                    }
                    break WorkerExit::FinishedByScore;
                }
                WorkerStep::Continue => {}
            }

            // waiting for the stop signal doubles as sleeping until the next tick
            match self.stop_rx.recv_timeout(self.tick_interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break WorkerExit::FinishedByStop,
                Err(RecvTimeoutError::Timeout) => {}
            }
        };

        debug!(
            horse = self.horse.label(),
            score = self.horse.current_score(),
            ?exit,
            "Race worker finished"
        );
        exit
    }

    // notify the coordinator without blocking: if the channel is full (already notified) or
    // disconnected (coordinator gone), the message is dropped
    fn signal_completion(&self) {
        match self.done_tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => debug!("Completion was already signaled"),
            Err(TrySendError::Disconnected(())) => debug!("Coordinator is not listening anymore"),
        }
    }
}
