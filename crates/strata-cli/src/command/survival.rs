use std::path::PathBuf;

use anyhow::Context;
use strata_core::{burndown::daily_matrix, observer::LogObserver, survival::survival_ratio};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SurvivalArg {
    /// Path to the decoded burndown JSON file
    pub input: PathBuf,

    /// Output file path (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SurvivalArg) -> anyhow::Result<()> {
    let input = util::read_burndown_file(&arg.input)?;
    let matrix = util::sparse_matrix_of(&input, &arg.input)?;
    let daily = daily_matrix(&input.header, &matrix, &mut LogObserver)
        .with_context(|| format!("Failed to interpolate burndown of {}", input.name))?;

    let curve = survival_ratio(&daily);
    if curve.is_empty() {
        log::warn!("{}: no lines were ever alive", input.name);
    }
    match curve.half_life() {
        Some(days) => log::info!(
            "{}: half of the lines are gone after {days:.1} days",
            input.name
        ),
        None => log::info!("{}: more than half of the lines are still alive", input.name),
    }

    let mut output = util::Output::from_output_path(arg.output.as_deref())?;
    output.write_text(&curve.to_string())?;
    Ok(())
}
