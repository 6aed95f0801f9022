use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use strata_core::{
    burndown::{BurndownOptions, load_burndown},
    calendar::ResampleMode,
    observer::LogObserver,
};

use crate::{postprocess, util};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum OutputFormat {
    #[default]
    Json,
    Tsv,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BurndownArg {
    /// Path to the decoded burndown JSON file
    pub input: PathBuf,

    /// Bucket size: year, month, week, day, or raw to keep the original bands
    #[arg(long, default_value = "year")]
    pub resample: ResampleMode,

    /// Show each bucket's share of the lines alive that day instead of line counts
    #[arg(long)]
    pub relative: bool,

    /// Drop days before this date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Drop days after this date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Report the survival ratio of the interpolated matrix
    #[arg(long)]
    pub survival: bool,

    /// Output format: json or tsv
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BurndownArg) -> anyhow::Result<()> {
    let input = util::read_burndown_file(&arg.input)?;
    let matrix = util::sparse_matrix_of(&input, &arg.input)?;
    log::info!(
        "{}: {} bands x {} samples",
        input.name,
        matrix.rows(),
        matrix.cols()
    );

    let options = BurndownOptions {
        resample: arg.resample,
        report_survival: arg.survival,
    };
    let mut burndown = load_burndown(
        &input.name,
        &input.header,
        &matrix,
        &options,
        &mut LogObserver,
    )
    .with_context(|| format!("Failed to process burndown of {}", input.name))?;

    if burndown.resample_mode != arg.resample {
        log::info!("resampled by {} instead", burndown.resample_mode);
    }
    if arg.start_date.is_some() || arg.end_date.is_some() {
        postprocess::clip_dates(&mut burndown, arg.start_date, arg.end_date);
    }
    if arg.relative {
        postprocess::make_relative(&mut burndown);
    }

    let mut output = util::Output::from_output_path(arg.output.as_deref())?;
    match arg.format {
        OutputFormat::Json => output.write_json(&burndown)?,
        OutputFormat::Tsv => output.write_text(&postprocess::to_tsv(&burndown)?)?,
    }
    log::info!(
        "{} rows x {} days written to {}",
        burndown.matrix.len(),
        burndown.date_range.len(),
        output.display_path()
    );

    Ok(())
}
