use crate::core::horse::Horse;
use std::fmt::Write;
use std::sync::Arc;

/// Width of the label column left of the track (labels are one character plus a two-digit index).
pub const LABEL_WIDTH: usize = 3;

/// Valid range of the score target and the fallback used for anything outside of it.
pub const SCORE_TARGET_MIN: i32 = 10;
pub const SCORE_TARGET_MAX: i32 = 100;
pub const SCORE_TARGET_DEFAULT: i32 = 75;

// every TRACK_UNIT-th position of the ruler gets a major mark
const TRACK_UNIT: usize = 10;

/// normalize_score_target returns the score target if it is within [SCORE_TARGET_MIN,
/// SCORE_TARGET_MAX] and SCORE_TARGET_DEFAULT otherwise.
pub fn normalize_score_target(score_target: i32) -> i32 {
    if (SCORE_TARGET_MIN..=SCORE_TARGET_MAX).contains(&score_target) {
        score_target
    } else {
        SCORE_TARGET_DEFAULT
    }
}

// number of characters between the opening and the closing bar of the track
fn track_width(score_target: i32) -> usize {
    normalize_score_target(score_target) as usize + 2
}

/// render_ruler returns the boundary line of the track, e.g. "   +---------|-------+" for a score
/// target of 15. The ruler is LABEL_WIDTH + score target + 4 characters wide.
pub fn render_ruler(score_target: i32) -> String {
    let track_width = track_width(score_target);
    let mut ruler = String::with_capacity(LABEL_WIDTH + track_width + 2);

    ruler.push_str(&" ".repeat(LABEL_WIDTH));
    ruler.push('+');

    for pos in 1..=track_width {
        ruler.push(if pos % TRACK_UNIT == 0 { '|' } else { '-' });
    }

    ruler.push('+');
    ruler
}

/// render_horse_row returns the track line of a horse, e.g. "A01|.....A01   ...   |". The label
/// is re-printed at the current position of the horse, which is clamped such that the label ends
/// flush against the closing bar at the latest. The row has always the same width as the ruler.
pub fn render_horse_row(horse: &Horse, score_target: i32) -> String {
    let track_width = track_width(score_target);

    // clip the label to the gutter and to the track
    let gutter: String = horse.label().chars().take(LABEL_WIDTH).collect();
    let inline_label: String = horse.label().chars().take(track_width).collect();
    let inline_len = inline_label.chars().count();

    let max_pos = track_width - inline_len;
    let pos = (horse.current_score().max(0) as usize).min(max_pos);

    let mut row = String::with_capacity(LABEL_WIDTH + track_width + 2);
    write!(
        &mut row,
        "{:<width$}|{}{}{}|",
        gutter,
        ".".repeat(pos),
        inline_label,
        " ".repeat(max_pos - pos),
        width = LABEL_WIDTH
    )
    .unwrap();
    row
}

/// render_frame returns the complete track (ruler, one row per horse in the given order, ruler),
/// every line terminated by a newline.
pub fn render_frame(horses: &[Arc<Horse>], score_target: i32) -> String {
    let ruler = render_ruler(score_target);
    let mut frame = String::with_capacity((ruler.len() + 1) * (horses.len() + 2));

    writeln!(&mut frame, "{}", ruler).unwrap();
    for horse in horses.iter() {
        writeln!(&mut frame, "{}", render_horse_row(horse, score_target)).unwrap();
    }
    writeln!(&mut frame, "{}", ruler).unwrap();

    frame
}

/// clear_terminal returns the escape sequence that moves the cursor home and clears the screen.
pub fn clear_terminal() -> &'static str {
    "\x1b[H\x1b[2J"
}
