use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;
use racesim::core::handle_race::{handle_race, run_race, RaceOutput, RaceTiming};
use racesim::core::horse::Horse;
use racesim::core::race_state::RaceState;
use racesim::core::race_worker::{step, RaceWorker, StopSignal, Stride, WorkerExit, WorkerStep};
use racesim::post::race_outcome::RaceOutcome;
use racesim::pre::check_race_input::RaceInput;
use std::io::{self, Write};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// SharedBuffer collects the display output such that it can be inspected after the race.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn fast_timing(stride: Stride) -> RaceTiming {
    RaceTiming {
        tick_interval: Duration::from_millis(10),
        refresh_interval: Duration::from_millis(5),
        stride,
    }
}

fn race_with_scores(scores: &[(&str, i32)], score_target: i32) -> Arc<RaceState> {
    let horses = scores
        .iter()
        .map(|&(label, score)| Arc::new(Horse::with_score(label, score)))
        .collect();

    Arc::new(RaceState::with_horses(horses, score_target))
}

fn scores(race_state: &RaceState) -> Vec<i32> {
    race_state
        .horses()
        .iter()
        .map(|horse| horse.current_score())
        .collect()
}

fn single_worker(
    horse: &Arc<Horse>,
    race_state: &Arc<RaceState>,
    stride: Stride,
) -> (RaceWorker, StopSignal, flume::Receiver<()>) {
    let (stop_signal, stop_rx) = StopSignal::new();
    let (done_tx, done_rx) = flume::bounded(1);

    let worker = RaceWorker {
        horse: Arc::clone(horse),
        race_state: Arc::clone(race_state),
        stop_rx,
        done_tx,
        wait_group: WaitGroup::new(),
        tick_interval: Duration::from_millis(20),
        stride,
    };

    (worker, stop_signal, done_rx)
}

// RACE WORKER -------------------------------------------------------------------------------------

#[test]
fn test_worker_reaches_target() {
    let race_state = race_with_scores(&[("B02", 20)], 25);
    let horse = race_state.horses()[0].clone();
    let (worker, _stop_signal, done_rx) = single_worker(&horse, &race_state, Stride::Fixed(5));

    assert_eq!(worker.run(), WorkerExit::FinishedByScore);
    assert_eq!(done_rx.try_recv(), Ok(()));
    assert!(horse.current_score() >= 25);
    assert!(race_state.is_race_over());
    assert_eq!(race_state.winner().unwrap().label(), "B02");
}

#[test]
fn test_worker_negative_score_starts_at_zero() {
    let race_state = race_with_scores(&[("A01", -99)], 15);
    let horse = race_state.horses()[0].clone();
    let (worker, _stop_signal, _done_rx) = single_worker(&horse, &race_state, Stride::Fixed(5));

    assert_eq!(worker.run(), WorkerExit::FinishedByScore);
    assert_eq!(horse.current_score(), 15);
}

#[test]
fn test_worker_stops_on_stop_signal() {
    let race_state = race_with_scores(&[("C03", 5)], 100);
    let horse = race_state.horses()[0].clone();
    let (worker, stop_signal, _done_rx) = single_worker(&horse, &race_state, Stride::Fixed(1));

    let handle = thread::spawn(move || worker.run());
    thread::sleep(Duration::from_millis(10));
    stop_signal.stop();
    stop_signal.stop();

    assert_eq!(handle.join().unwrap(), WorkerExit::FinishedByStop);
    assert!(horse.current_score() < 100);
    assert!(race_state.winner().is_none());
}

#[test]
fn test_worker_stops_on_game_over() {
    let race_state = race_with_scores(&[("STOP", 0)], 100);
    race_state.conclude_without_winner();
    let horse = race_state.horses()[0].clone();
    let (worker, _stop_signal, _done_rx) = single_worker(&horse, &race_state, Stride::Fixed(1));

    assert_eq!(worker.run(), WorkerExit::FinishedByGameOver);
    assert_eq!(horse.current_score(), 0);
}

#[test]
fn test_worker_full_completion_channel() {
    let race_state = race_with_scores(&[("TEST", 8)], 10);
    let horse = race_state.horses()[0].clone();
    let (worker, _stop_signal, done_rx) = single_worker(&horse, &race_state, Stride::Fixed(1));

    // fill the completion channel such that the worker cannot signal
    worker.done_tx.try_send(()).unwrap();

    let handle = thread::spawn(move || worker.run());
    assert_eq!(handle.join().unwrap(), WorkerExit::FinishedByScore);
    assert_eq!(done_rx.len(), 1);
    assert_eq!(race_state.winner().unwrap().label(), "TEST");
}

#[test]
fn test_worker_releases_wait_group() {
    let race_state = race_with_scores(&[("A01", 0), ("B02", 0)], 100);
    let wait_group = WaitGroup::new();
    let (stop_signal, stop_rx) = StopSignal::new();
    let (done_tx, _done_rx) = flume::bounded(1);

    for horse in race_state.horses() {
        let worker = RaceWorker {
            horse,
            race_state: Arc::clone(&race_state),
            stop_rx: stop_rx.clone(),
            done_tx: done_tx.clone(),
            wait_group: wait_group.clone(),
            tick_interval: Duration::from_millis(10),
            stride: Stride::Fixed(1),
        };
        thread::spawn(move || worker.run());
    }

    stop_signal.stop();
    wait_group.wait();
    assert!(race_state.horses().iter().all(|horse| horse.current_score() < 100));
}

#[test]
fn test_exactly_one_declared_winner_per_tick() {
    for _ in 0..20 {
        let labels: Vec<String> = (1..=16).map(|idx| format!("H{:02}", idx)).collect();
        let start_scores: Vec<(&str, i32)> =
            labels.iter().map(|label| (label.as_str(), 29)).collect();
        let race_state = race_with_scores(&start_scores, 30);
        let barrier = Arc::new(Barrier::new(16));

        // every horse crosses the score target within the same tick
        let handles: Vec<_> = race_state
            .horses()
            .into_iter()
            .map(|horse| {
                let race_state = Arc::clone(&race_state);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    step(&horse, &race_state, &Stride::Fixed(1))
                })
            })
            .collect();

        let steps: Vec<WorkerStep> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        let no_declared = steps
            .iter()
            .filter(|&&worker_step| worker_step == WorkerStep::ReachedTarget { declared: true })
            .count();
        let no_game_over = steps
            .iter()
            .filter(|&&worker_step| worker_step == WorkerStep::GameOver)
            .count();

        assert_eq!(no_declared, 1);
        assert!(steps.iter().all(|&worker_step| worker_step != WorkerStep::Continue));
        assert!(no_game_over < 16);
        assert!(race_state.is_race_over());
        assert!(race_state.winner().unwrap().current_score() >= 30);
    }
}

// RACE COORDINATOR --------------------------------------------------------------------------------

#[test]
fn test_exactly_one_winner() {
    for _ in 0..20 {
        let labels: Vec<String> = (1..=16).map(|idx| format!("H{:02}", idx)).collect();
        let start_scores: Vec<(&str, i32)> =
            labels.iter().map(|label| (label.as_str(), 29)).collect();
        let race_state = race_with_scores(&start_scores, 30);

        let outcome = run_race(
            Arc::clone(&race_state),
            &fast_timing(Stride::Fixed(1)),
            Duration::from_secs(5),
            None,
        );

        let winner = race_state.winner().unwrap();
        assert_eq!(
            outcome,
            RaceOutcome::Winner {
                label: winner.label().to_owned(),
                score: winner.current_score(),
            }
        );
        assert!(winner.current_score() >= 30);

        // all workers are gone: nobody advances anymore
        let scores_after = scores(&race_state);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(scores_after, scores(&race_state));
    }
}

#[test]
fn test_leading_horse_wins() {
    let race_state = race_with_scores(&[("H01", 20), ("H02", 0)], 30);

    let outcome = run_race(
        race_state,
        &fast_timing(Stride::Fixed(5)),
        Duration::from_secs(5),
        None,
    );

    match outcome {
        RaceOutcome::Winner { label, score } => {
            assert_eq!(label, "H01");
            assert!(score >= 30);
        }
        RaceOutcome::TimedOut => panic!("Race should not time out!"),
    }
}

#[test]
fn test_timeout() {
    let race_state = race_with_scores(&[("H01", 0), ("H02", 0)], 100);
    let timing = RaceTiming {
        tick_interval: Duration::from_millis(50),
        refresh_interval: Duration::from_millis(10),
        stride: Stride::Fixed(1),
    };

    let outcome = run_race(
        Arc::clone(&race_state),
        &timing,
        Duration::from_millis(200),
        None,
    );

    assert_eq!(outcome, RaceOutcome::TimedOut);
    assert!(race_state.is_race_over());
    assert!(race_state.winner().is_none());

    let scores_after = scores(&race_state);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(scores_after, scores(&race_state));
}

#[test]
fn test_race_without_horses() {
    let race_state = Arc::new(RaceState::new(30));

    let outcome = run_race(
        race_state,
        &fast_timing(Stride::Fixed(1)),
        Duration::from_secs(5),
        None,
    );

    assert_eq!(outcome, RaceOutcome::TimedOut);
}

#[test]
fn test_handle_race_headless() {
    let race_input = RaceInput {
        horse_label: "T".to_owned(),
        horses_quantity: 3,
        score_target: 10,
        game_timeout: "10s".to_owned(),
    };

    let outcome = handle_race(&race_input, &fast_timing(Stride::Fixed(2)), None);
    assert!(outcome.winner_label().unwrap().starts_with("T0"));
}

#[test]
fn test_handle_race_checks_input() {
    // every value is out of range and replaced by its default, i.e. 5 horses labeled H01 to H05
    let race_input = RaceInput {
        horse_label: "ABC".to_owned(),
        horses_quantity: 0,
        score_target: 5,
        game_timeout: "0s".to_owned(),
    };
    let timing = RaceTiming {
        tick_interval: Duration::from_millis(1),
        refresh_interval: Duration::from_millis(5),
        stride: Stride::Fixed(5),
    };

    let outcome = handle_race(&race_input, &timing, None);

    match outcome {
        RaceOutcome::Winner { label, score } => {
            assert!(["H01", "H02", "H03", "H04", "H05"].contains(&label.as_str()));
            assert!(score >= 75);
        }
        RaceOutcome::TimedOut => panic!("Race should not time out!"),
    }
}

// DISPLAY -----------------------------------------------------------------------------------------

#[test]
fn test_display_announces_winner() {
    let race_state = race_with_scores(&[("H01", 20), ("H02", 0)], 30);
    let buffer = SharedBuffer::default();
    let out: RaceOutput = Box::new(buffer.clone());

    let outcome = run_race(
        race_state,
        &fast_timing(Stride::Fixed(5)),
        Duration::from_secs(5),
        Some(out),
    );
    let output = buffer.contents();

    assert_eq!(outcome.winner_label(), Some("H01"));
    assert!(output.starts_with("\x1b[H\x1b[2J\n   +---------|---------|---------|-+\n"));
    assert!(output.contains("H02|"));
    assert!(output.ends_with(&format!(
        "{}\n",
        outcome.announcement(Duration::from_secs(5))
    )));
    assert_eq!(output.matches("The horse winner is").count(), 1);
}

#[test]
fn test_display_announces_timeout() {
    let race_state = race_with_scores(&[("X01", 0), ("X02", 0)], 100);
    let buffer = SharedBuffer::default();
    let out: RaceOutput = Box::new(buffer.clone());
    let timing = RaceTiming {
        tick_interval: Duration::from_millis(50),
        refresh_interval: Duration::from_millis(10),
        stride: Stride::Fixed(1),
    };

    let outcome = run_race(race_state, &timing, Duration::from_millis(200), Some(out));
    let output = buffer.contents();

    assert_eq!(outcome, RaceOutcome::TimedOut);
    assert!(output.contains("X01|"));
    assert!(output.ends_with("The horses are tired! No winner after 200ms\n"));
    assert!(!output.contains("The horse winner is"));
}
