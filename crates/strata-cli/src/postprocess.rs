//! Presentation-side adjustments applied after the core pipeline.

use std::fmt::Write as _;

use anyhow::Context as _;
use chrono::NaiveDate;
use strata_core::burndown::ProcessedBurndown;

/// Divides every column by its sum, so each day shows shares instead of lines.
///
/// Columns without any lines are left at zero.
pub fn make_relative(burndown: &mut ProcessedBurndown) {
    let cols = burndown.date_range.len();
    for col in 0..cols {
        let sum = burndown.matrix.iter().map(|row| row[col]).sum::<f64>();
        if sum == 0.0 {
            continue;
        }
        for row in &mut burndown.matrix {
            row[col] /= sum;
        }
    }
}

/// Keeps only the columns whose date lies within `[from, to]` (both optional).
pub fn clip_dates(
    burndown: &mut ProcessedBurndown,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) {
    let keep = burndown
        .date_range
        .iter()
        .map(|date| {
            let date = date.date_naive();
            from.is_none_or(|from| from <= date) && to.is_none_or(|to| date <= to)
        })
        .collect::<Vec<_>>();

    let mut keep_iter = keep.iter();
    burndown.date_range.retain(|_| *keep_iter.next().unwrap_or(&false));
    for row in &mut burndown.matrix {
        let mut keep_iter = keep.iter();
        row.retain(|_| *keep_iter.next().unwrap_or(&false));
    }
}

/// Renders the burndown as tab-separated values: one line per day,
/// one column per label.
pub fn to_tsv(burndown: &ProcessedBurndown) -> anyhow::Result<String> {
    let mut out = String::from("date");
    for label in &burndown.labels {
        out.push('\t');
        out.push_str(label);
    }
    out.push('\n');

    for (col, date) in burndown.date_range.iter().enumerate() {
        write!(out, "{}", date.format("%Y-%m-%d"))
            .with_context(|| format!("Failed to write TSV row for {date}"))?;
        for row in &burndown.matrix {
            write!(out, "\t{}", row[col])
                .with_context(|| format!("Failed to write TSV cell for {date}"))?;
        }
        out.push('\n');
    }
    Ok(out)
}
