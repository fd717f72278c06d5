use crate::core::race_state::RaceState;
use crate::core::track::{clear_terminal, render_frame};
use std::io::{self, Write};
use std::thread::sleep;
use std::time::Duration;

/// DisplayExit describes why the display loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayExit {
    WinnerAnnounced,
    RaceOver,
}

/// write_frame writes a single frame (clear sequence, empty line, track, empty line) of the current
/// race state to out.
pub fn write_frame<W: Write + ?Sized>(race_state: &RaceState, out: &mut W) -> io::Result<()> {
    let frame = render_frame(&race_state.horses(), race_state.score_target());
    write!(out, "{}\n{}\n", clear_terminal(), frame)
}

/// run_display redraws the track every refresh_interval. When a winner was declared, the last
/// frame is followed by the winner announcement and the loop stops. If the race is over without a
/// winner (timeout), the loop stops silently since the coordinator announces the timeout itself.
pub fn run_display<W: Write + ?Sized>(
    race_state: &RaceState,
    out: &mut W,
    refresh_interval: Duration,
) -> io::Result<DisplayExit> {
    loop {
        // race_over must be read before the winner: the winner is stored before the flag is set,
        // therefore a set flag without a winner really means that there is none
        let race_over = race_state.is_race_over();
        let winner = race_state.winner();

        write_frame(race_state, out)?;

        if let Some(winner) = winner {
            writeln!(out, "{}", winner.winner_message())?;
            out.flush()?;
            return Ok(DisplayExit::WinnerAnnounced);
        }

        out.flush()?;

        if race_over {
            return Ok(DisplayExit::RaceOver);
        }

        sleep(refresh_interval);
    }
}
