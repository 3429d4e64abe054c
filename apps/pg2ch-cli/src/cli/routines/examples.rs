//! `pg2ch examples`: the built-in sample schemas.

use super::{print_json, RoutineFailure, RoutineSuccess};
use crate::cli::display::Message;
use crate::framework::samples::SAMPLES;
use crate::utilities::constants::CLI_NAME;

pub fn examples(json: bool) -> Result<RoutineSuccess, RoutineFailure> {
    if json {
        print_json(&SAMPLES, "Examples")?;
        return Ok(RoutineSuccess::silent());
    }

    for sample in SAMPLES {
        println!("-- {}: {}", sample.name, sample.description);
        println!("{}\n", sample.ddl);
    }

    Ok(RoutineSuccess::success(Message::new(
        "Examples".to_string(),
        format!(
            "{} samples, pipe one into `{CLI_NAME} convert` to try it",
            SAMPLES.len()
        ),
    )))
}
