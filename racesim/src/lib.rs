pub mod core;
pub mod post;
pub mod pre;






#[cfg(test)]
mod display_tests {
    use crate::core::display::{run_display, DisplayExit};
    use crate::core::race_state::RaceState;
    use std::time::Duration;

    #[test]
    fn test_display_winner() {
        let race_state = RaceState::new(15);
        race_state.load_horses("H", 2);
        let winner = race_state.horses()[0].clone();
        winner.advance_by(15);
        race_state.declare_winner(&winner);

        let mut out: Vec<u8> = Vec::new();
        let exit = run_display(&race_state, &mut out, Duration::from_millis(10)).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert_eq!(exit, DisplayExit::WinnerAnnounced);
        assert_eq!(
            output,
            format!(
                "\x1b[H\x1b[2J\n   +---------|-------+\nH01|{}H01|\nH02|H02{}|\n   \
                +---------|-------+\n\nThe horse winner is: H01 - Score 15\n",
                ".".repeat(14),
                " ".repeat(14)
            )
        );
    }
    #[test]
    fn test_display_race_over_without_winner() {
        let race_state = RaceState::new(15);
        race_state.load_horses("H", 2);
        race_state.conclude_without_winner();

        let mut out: Vec<u8> = Vec::new();
        let exit = run_display(&race_state, &mut out, Duration::from_millis(10)).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert_eq!(exit, DisplayExit::RaceOver);
        assert!(output.starts_with("\x1b[H\x1b[2J\n"));
        assert!(output.contains("H02|H02"));
        assert!(!output.contains("winner"));
    }
}


#[cfg(test)]
mod read_race_input_tests {
    use crate::pre::read_race_input::read_race_input;
    use std::io::Write;

    #[test]
    fn test_read_race_input_1() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"horse_label": "R", "horses_quantity": 3, "score_target": 30}}"#
        )
        .unwrap();

        let race_input = read_race_input(file.path()).unwrap();
        assert_eq!(race_input.horse_label, "R");
        assert_eq!(race_input.horses_quantity, 3);
        assert_eq!(race_input.score_target, 30);
        assert_eq!(race_input.game_timeout, "10s");
    }
    #[test]
    fn test_read_race_input_2() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_race_input(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse parameter file"));
    }
}
