//! Numeric summaries for code survivorship data.
//!
//! This crate has no dependencies and knows nothing about calendars or
//! matrices; callers reduce their data to per-day series first.
//!
//! # Modules
//!
//! - [`survival`]: running alive/total ratio over a daily time axis
//!
//! # Examples
//!
//! ```
//! use strata_stats::survival::SurvivalRatioCurve;
//!
//! // Lines alive and lines ever written, per day.
//! let alive = [10.0, 9.0, 8.0];
//! let total = [10.0, 10.0, 10.0];
//! let curve = SurvivalRatioCurve::from_daily(&alive, &total);
//! assert_eq!(curve.ratio_at(0), 1.0);
//! assert!(curve.ratio_at(2) < 1.0);
//! ```

pub mod survival;
