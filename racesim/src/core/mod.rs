pub mod display;
pub mod handle_race;
pub mod horse;
pub mod latch;
pub mod race_state;
pub mod race_worker;
pub mod track;
