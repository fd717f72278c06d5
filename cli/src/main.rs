use anyhow::Context;
use clap::Parser;
use racesim::core::handle_race::{handle_race, RaceOutput, RaceTiming};
use racesim::post::race_outcome::RaceOutcome;
use racesim::post::race_summary::RaceSummary;
use racesim::pre::check_race_input::{check_race_input, RaceInput};
use racesim::pre::race_opts::RaceOpts;
use racesim::pre::read_race_input::read_race_input;
use rayon::prelude::*;
use std::cmp::min;
use std::io;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

// set maximum number of concurrently running races in case of running more than a single race
// (every race runs one thread per horse)
const MAX_NO_CONCURRENT_RACES: u32 = 20;

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get race options from the command line arguments
    let race_opts = RaceOpts::parse();

    // logs go to stderr such that they do not interfere with the track on stdout
    let level = if race_opts.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();

    // read race input from the parameter file (if given) and check it
    let race_input = match race_opts.parfile_path.as_deref() {
        Some(parfile_path) => read_race_input(parfile_path)
            .context("Could not read the race parameters!")?,
        None => race_opts.race_input(),
    };
    let race_pars = check_race_input(&race_input);
    let race_timing = RaceTiming::default();

    info!(?race_pars, no_races = race_opts.no_races, "Starting simulation");

    // continue with the checked input such that the fallback warnings are not repeated per race
    let race_input = RaceInput::from(&race_pars);

    // EXECUTION -----------------------------------------------------------------------------------
    if race_opts.no_races <= 1 {
        // SINGLE RACE WITH DISPLAY ----------------------------------------------------------------
        let out: RaceOutput = Box::new(io::stdout());
        let outcome = handle_race(&race_input, &race_timing, Some(out));

        if let RaceOutcome::Winner { label, score } = &outcome {
            info!(winner = label.as_str(), score, "Race finished");
        }
    } else {
        // MULTIPLE HEADLESS RACES -----------------------------------------------------------------
        let t_start = Instant::now();
        let mut outcomes: Vec<RaceOutcome> = Vec::with_capacity(race_opts.no_races as usize);
        let mut no_races_left = race_opts.no_races;

        while no_races_left > 0 {
            // calculate number of races to execute in current loop
            let tmp_no_races = min(no_races_left, MAX_NO_CONCURRENT_RACES);

            // simulate the races and save the outcomes
            outcomes.par_extend(
                (0..tmp_no_races)
                    .into_par_iter()
                    .map(|_| handle_race(&race_input, &race_timing, None)),
            );

            // reduce remaining races
            no_races_left -= tmp_no_races;
        }

        println!(
            "INFO: Execution time (total): {}ms",
            t_start.elapsed().as_millis()
        );

        // POST-PROCESSING -------------------------------------------------------------------------
        RaceSummary::from_outcomes(&outcomes).print_summary();
    }

    Ok(())
}
