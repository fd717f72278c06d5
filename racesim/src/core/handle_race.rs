use crate::core::display::{run_display, write_frame};
use crate::core::race_state::RaceState;
use crate::core::race_worker::{RaceWorker, StopSignal, Stride, WorkerExit};
use crate::post::race_outcome::RaceOutcome;
use crate::pre::check_race_input::{check_race_input, RaceInput};
use crossbeam::sync::WaitGroup;
use flume::RecvTimeoutError;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Time between two ticks of a race worker.
pub const DELAY_HORSE_STEP: Duration = Duration::from_millis(500);

/// Time between two frames of the display.
pub const DELAY_REFRESH_SCREEN: Duration = Duration::from_millis(100);

/// Score range a horse advances by per tick.
pub const STRIDE_DEFAULT: Stride = Stride::Uniform { min: 1, max: 5 };

/// Output the display writes its frames to (e.g. stdout).
pub type RaceOutput = Box<dyn Write + Send>;

/// * `tick_interval` - Time between two ticks of a race worker
/// * `refresh_interval` - Time between two frames of the display
/// * `stride` - Score delta per tick
#[derive(Debug, Clone, Copy)]
pub struct RaceTiming {
    pub tick_interval: Duration,
    pub refresh_interval: Duration,
    pub stride: Stride,
}

impl Default for RaceTiming {
    fn default() -> Self {
        RaceTiming {
            tick_interval: DELAY_HORSE_STEP,
            refresh_interval: DELAY_REFRESH_SCREEN,
            stride: STRIDE_DEFAULT,
        }
    }
}

/// handle_race checks the inserted race input (invalid values are replaced by their defaults),
/// creates the horses, runs the race and returns its outcome. If out is None, the race runs without
/// display.
pub fn handle_race(
    race_input: &RaceInput,
    race_timing: &RaceTiming,
    out: Option<RaceOutput>,
) -> RaceOutcome {
    let race_pars = check_race_input(race_input);
    let race_state = Arc::new(RaceState::new(race_pars.score_target));
    race_state.load_horses(&race_pars.horse_label, race_pars.horses_quantity);

    run_race(race_state, race_timing, race_pars.game_timeout, out)
}

/// run_race starts one worker thread per horse and (if out is given) a display thread, waits until
/// either a horse won or game_timeout elapsed, stops all workers, and returns the outcome. All
/// workers have finished when the function returns.
pub fn run_race(
    race_state: Arc<RaceState>,
    race_timing: &RaceTiming,
    game_timeout: Duration,
    out: Option<RaceOutput>,
) -> RaceOutcome {
    // START ---------------------------------------------------------------------------------------
    let t_start = Instant::now();
    let (stop_signal, stop_rx) = StopSignal::new();
    let (done_tx, done_rx) = flume::bounded(1);
    let wait_group = WaitGroup::new();

    let horses = race_state.horses();
    let mut worker_handles = Vec::with_capacity(horses.len());

    for horse in horses {
        let worker = RaceWorker {
            horse,
            race_state: Arc::clone(&race_state),
            stop_rx: stop_rx.clone(),
            done_tx: done_tx.clone(),
            wait_group: wait_group.clone(),
            tick_interval: race_timing.tick_interval,
            stride: race_timing.stride,
        };

        worker_handles.push(thread::spawn(move || worker.run()));
    }

    // the coordinator keeps neither end, such that a race without any horse cannot block
    drop(stop_rx);
    drop(done_tx);

    let display_handle = out.map(|mut out| {
        let race_state = Arc::clone(&race_state);
        let refresh_interval = race_timing.refresh_interval;

        thread::spawn(move || {
            let res = run_display(race_state.as_ref(), &mut out, refresh_interval);
            (out, res)
        })
    });

    info!(
        no_horses = worker_handles.len(),
        score_target = race_state.score_target(),
        ?game_timeout,
        "Race started"
    );

    // WAIT ----------------------------------------------------------------------------------------
    match done_rx.recv_timeout(game_timeout) {
        Ok(()) => debug!("Race finished by a horse"),
        Err(RecvTimeoutError::Timeout) => {
            if race_state.conclude_without_winner() {
                info!(?game_timeout, "Race timed out");
            }
        }
        Err(RecvTimeoutError::Disconnected) => {
            // all workers are gone without a completion message, i.e. there is no horse
            race_state.conclude_without_winner();
        }
    }

    // SHUTDOWN ------------------------------------------------------------------------------------
    stop_signal.stop();
    wait_group.wait();

    let mut no_stopped = 0;

    for handle in worker_handles {
        match handle.join() {
            Ok(WorkerExit::FinishedByStop) | Ok(WorkerExit::FinishedByGameOver) => no_stopped += 1,
            Ok(WorkerExit::FinishedByScore) => {}
            Err(_) => warn!("A race worker panicked"),
        }
    }

    let mut out = display_handle.and_then(|handle| match handle.join() {
        Ok((out, Ok(exit))) => {
            debug!(?exit, "Display finished");
            Some(out)
        }
        Ok((_, Err(err))) => {
            warn!("Display stopped due to a write error: {}", err);
            None
        }
        Err(_) => {
            warn!("The display panicked");
            None
        }
    });

    // RESULT --------------------------------------------------------------------------------------
    let outcome = match race_state.winner() {
        Some(winner) => RaceOutcome::Winner {
            label: winner.label().to_owned(),
            score: winner.current_score(),
        },
        None => RaceOutcome::TimedOut,
    };

    // the display stopped silently on timeout, print the final state together with the timeout
    if let Some(out) = out.as_mut().filter(|_| outcome.is_timed_out()) {
        if let Err(err) = write_timeout(race_state.as_ref(), out, game_timeout) {
            warn!("Could not write the race result: {}", err);
        }
    }

    info!(
        ?outcome,
        no_stopped,
        duration_ms = t_start.elapsed().as_millis() as u64,
        "Race finished"
    );
    outcome
}

fn write_timeout(
    race_state: &RaceState,
    out: &mut RaceOutput,
    game_timeout: Duration,
) -> std::io::Result<()> {
    write_frame(race_state, out)?;
    writeln!(out, "{}", RaceOutcome::TimedOut.announcement(game_timeout))?;
    out.flush()
}
