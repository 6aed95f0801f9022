use std::fmt;

/// Running survival ratio of lines over a daily time axis.
///
/// For every day `d` the ratio is
///
/// ```text
/// ratio(d) = Σ_{c<=d} alive(c) / Σ_{c<=d} total(c)
/// ```
///
/// where `alive(c)` is the number of lines present on day `c` and `total(c)`
/// is the number of lines ever written up to day `c`. This is a running
/// ratio of cumulative sums, not a Kaplan-Meier product-limit estimate: every
/// day is weighted by the size of the population on that day.
///
/// # Fields
///
/// The curve stores parallel vectors. Days on which the cumulative total is
/// still zero carry no information and are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurvivalRatioCurve {
    /// Day offsets (column indices) of the stored points, ascending.
    pub days: Vec<usize>,
    /// Alive fraction at each corresponding day, in `0.0..=1.0` for consistent input.
    pub ratios: Vec<f64>,
    /// Cumulative alive sum up to and including each day.
    pub cumulative_alive: Vec<f64>,
    /// Cumulative total sum up to and including each day.
    pub cumulative_total: Vec<f64>,
}

impl SurvivalRatioCurve {
    /// Computes the curve from per-day alive and total counts.
    ///
    /// # Arguments
    ///
    /// * `alive` - Lines present on each day
    /// * `total` - Lines ever written up to each day (must dominate `alive`
    ///   for the ratio to stay within `0.0..=1.0`)
    ///
    /// Extra trailing entries of the longer slice are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strata_stats::survival::SurvivalRatioCurve;
    /// let curve = SurvivalRatioCurve::from_daily(&[0.0, 4.0, 2.0], &[0.0, 4.0, 4.0]);
    /// // Day 0 has no lines yet and is skipped.
    /// assert_eq!(curve.days, vec![1, 2]);
    /// assert_eq!(curve.ratios[0], 1.0);
    /// assert_eq!(curve.ratios[1], 0.75);
    /// ```
    #[must_use]
    pub fn from_daily(alive: &[f64], total: &[f64]) -> Self {
        let mut curve = Self::default();
        let mut alive_sum = 0.0;
        let mut total_sum = 0.0;

        for (day, (&a, &t)) in alive.iter().zip(total).enumerate() {
            alive_sum += a;
            total_sum += t;
            if total_sum <= 0.0 {
                continue;
            }
            curve.days.push(day);
            curve.ratios.push(alive_sum / total_sum);
            curve.cumulative_alive.push(alive_sum);
            curve.cumulative_total.push(total_sum);
        }

        curve
    }

    /// Returns `true` if no day carried any lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Returns the ratio at a specific day.
    ///
    /// Step lookup: the value of the last stored point at or before `day`.
    /// Returns `1.0` before the first point.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strata_stats::survival::SurvivalRatioCurve;
    /// let curve = SurvivalRatioCurve::from_daily(&[0.0, 4.0, 2.0], &[0.0, 4.0, 4.0]);
    /// assert_eq!(curve.ratio_at(0), 1.0);
    /// assert_eq!(curve.ratio_at(10), 0.75);
    /// ```
    #[must_use]
    pub fn ratio_at(&self, day: usize) -> f64 {
        match self.days.partition_point(|&d| d <= day) {
            0 => 1.0,
            n => self.ratios[n - 1],
        }
    }

    /// Returns the first day on which the ratio reaches `0.5` or less.
    ///
    /// Linear interpolation is used between the two surrounding points.
    /// Returns `None` if the ratio never drops to 50%.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn half_life(&self) -> Option<f64> {
        let i = self.ratios.iter().position(|&r| r <= 0.5)?;
        if i == 0 {
            return Some(self.days[0] as f64);
        }
        let t0 = self.days[i - 1] as f64;
        let t1 = self.days[i] as f64;
        let r0 = self.ratios[i - 1];
        let r1 = self.ratios[i];
        Some(t0 + (0.5 - r0) / (r1 - r0) * (t1 - t0))
    }
}

impl fmt::Display for SurvivalRatioCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (day, ratio) in self.days.iter().zip(&self.ratios) {
            writeln!(f, "{day} days\t{ratio}")?;
        }
        Ok(())
    }
}
