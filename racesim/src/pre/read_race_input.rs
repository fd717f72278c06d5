use crate::pre::check_race_input::RaceInput;
use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;

/// read_race_input reads the JSON file and decodes the JSON string into the race input struct.
/// Missing fields are filled with their defaults.
pub fn read_race_input(filepath: &Path) -> anyhow::Result<RaceInput> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .with_context(|| format!("Failed to open parameter file {}!", filepath.display()))?;

    // read and parse parameter file content
    let race_input = serde_json::from_reader(&fh)
        .with_context(|| format!("Failed to parse parameter file {}!", filepath.display()))?;
    Ok(race_input)
}
