pub mod check_race_input;
pub mod race_opts;
pub mod read_race_input;
