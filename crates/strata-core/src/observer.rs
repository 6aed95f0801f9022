//! Progress and diagnostic notifications from the pipeline.
//!
//! The pipeline itself never writes to stdout or stderr. Callers pass a
//! [`BurndownObserver`]; [`LogObserver`] forwards everything to the `log`
//! facade, [`NoopObserver`] discards it.

use strata_stats::survival::SurvivalRatioCurve;

use crate::{TooLooseError, calendar::Period};

/// Receives notifications while a burndown is processed.
///
/// Every method has an empty default implementation.
pub trait BurndownObserver {
    /// Band `band` of `bands` is about to be expanded to daily resolution.
    fn interpolating(&mut self, _band: usize, _bands: usize) {}

    /// Resampling into `period` buckets is about to start.
    fn resampling(&mut self, _period: Period) {}

    /// Resampling failed with `error` and is retried with `next`.
    fn fallback(&mut self, _error: &TooLooseError, _next: Period) {}

    /// The survival ratio was computed.
    fn survival(&mut self, _curve: &SurvivalRatioCurve) {}

    /// The raw path produced `count` labels, too many for a readable legend.
    fn too_many_labels(&mut self, _count: usize) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BurndownObserver for NoopObserver {}

/// Forwards notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl BurndownObserver for LogObserver {
    fn interpolating(&mut self, band: usize, bands: usize) {
        log::debug!("interpolating band {}/{bands}", band + 1);
    }

    fn resampling(&mut self, period: Period) {
        log::info!("resampling to {period}, please wait...");
    }

    fn fallback(&mut self, error: &TooLooseError, next: Period) {
        log::warn!("{error}; trying by {next}");
    }

    fn survival(&mut self, curve: &SurvivalRatioCurve) {
        log::info!("survival ratio over {} days", curve.days.len());
        for line in curve.to_string().lines() {
            log::debug!("{line}");
        }
        if let Some(half_life) = curve.half_life() {
            log::info!("half of the lines are gone after {half_life:.1} days");
        }
    }

    fn too_many_labels(&mut self, count: usize) {
        log::warn!("too many labels ({count}), consider resampling");
    }
}
