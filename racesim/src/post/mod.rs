pub mod race_outcome;
pub mod race_summary;
