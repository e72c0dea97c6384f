//! Post-run extraction of the steady-state window and the Poincaré section.

use crate::error::{CgleError, Result};
use crate::integrator::Cgle;
use crate::params::{CgleParameters, GridSettings};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Grid point whose trajectory is reported; the first interior site.
pub const PROBE_SITE: usize = 1;

/// Level the companion series is sectioned against.
pub const SECTION_THRESHOLD: f64 = 0.0;

/// Steady-state window `[N, N + M·N]` in time-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    /// `u1[t][i]`, shape `(M·N + 1) × n`.
    pub u1: Vec<Vec<f64>>,
    /// `v1[t][i]`, shape `(M·N + 1) × n`.
    pub v1: Vec<Vec<f64>>,
    /// Real part at the probe site across the window.
    pub re: Vec<f64>,
    /// Imaginary part at the probe site across the window.
    pub im: Vec<f64>,
}

impl ResultBundle {
    /// Probe-site trajectory as complex samples.
    pub fn trace(&self) -> Vec<Complex64> {
        self.re
            .iter()
            .zip(&self.im)
            .map(|(&re, &im)| Complex64::new(re, im))
            .collect()
    }
}

/// Points `(x, y)` sampled where the companion signal changes sign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoincareSection {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl PoincareSection {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Splits at `len / 2` so the earlier and later halves can be drawn apart.
    pub fn split_halves(&self) -> (PoincareSection, PoincareSection) {
        let half = self.len() / 2;
        (
            PoincareSection {
                x: self.x[..half].to_vec(),
                y: self.y[..half].to_vec(),
            },
            PoincareSection {
                x: self.x[half..].to_vec(),
                y: self.y[half..].to_vec(),
            },
        )
    }
}

/// Everything a consumer needs after one complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub params: CgleParameters,
    pub results: ResultBundle,
    pub poincare: PoincareSection,
}

/// Indices `nn` where `(series[nn] - threshold)·(series[nn + 1] - threshold) < 0`.
///
/// Touching the threshold without crossing it does not count.
pub fn detect_crossings(series: &[f64], threshold: f64) -> Vec<usize> {
    series
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| (pair[0] - threshold) * (pair[1] - threshold) < 0.0)
        .map(|(nn, _)| nn)
        .collect()
}

/// Emits `(sampled_x[nn], sampled_y[nn])` for every crossing of `companion`.
pub fn section_from_series(
    companion: &[f64],
    sampled_x: &[f64],
    sampled_y: &[f64],
    threshold: f64,
) -> Result<PoincareSection> {
    if sampled_x.len() != sampled_y.len() {
        return Err(CgleError::Analysis(format!(
            "sampled series lengths differ ({} vs {})",
            sampled_x.len(),
            sampled_y.len()
        )));
    }
    let mut section = PoincareSection::default();
    for nn in detect_crossings(companion, threshold) {
        if nn >= sampled_x.len() {
            return Err(CgleError::IndexOutOfRange(format!(
                "crossing {nn} has no sample among {} points",
                sampled_x.len()
            )));
        }
        section.x.push(sampled_x[nn]);
        section.y.push(sampled_y[nn]);
    }
    Ok(section)
}

impl Cgle {
    /// Re-slices the window `[N, N + M·N]` time-major and pulls out the
    /// probe-site trace.
    pub fn get_results(&self) -> Result<ResultBundle> {
        let history = self.history()?;
        let params = self.params();
        let size = params.window_len();
        let start = params.delay_steps;
        if history.sites() <= PROBE_SITE || history.steps() < start + size {
            return Err(CgleError::IndexOutOfRange(format!(
                "window [{start}, {}] exceeds history of shape {}x{}",
                start + size - 1,
                history.sites(),
                history.steps()
            )));
        }

        let (u, v) = (history.u(), history.v());
        let u1: Vec<Vec<f64>> = (0..size)
            .map(|j| u.column(start + j).iter().copied().collect())
            .collect();
        let v1: Vec<Vec<f64>> = (0..size)
            .map(|j| v.column(start + j).iter().copied().collect())
            .collect();
        let re = u1.iter().map(|row| row[PROBE_SITE]).collect();
        let im = v1.iter().map(|row| row[PROBE_SITE]).collect();

        Ok(ResultBundle { u1, v1, re, im })
    }

    /// Samples the probe-site trajectory from offset `2N` wherever its own
    /// `N`-offset copy changes sign.
    pub fn get_poincare_section(&self) -> Result<PoincareSection> {
        let history = self.history()?;
        let params = self.params();
        let delay = params.delay_steps;
        let t_length =
            ((params.tau * params.segments as f64 / params.k) as usize).saturating_add(1);
        if t_length > history.steps() {
            return Err(CgleError::IndexOutOfRange(format!(
                "section window {t_length} exceeds {} stored steps",
                history.steps()
            )));
        }

        let sample_start = (2 * delay).min(t_length);
        let (uu, vv) = history.site_series(PROBE_SITE, sample_start, t_length)?;
        let companion_end = t_length.saturating_sub(delay).max(delay);
        let (uud, _) = history.site_series(PROBE_SITE, delay, companion_end)?;

        section_from_series(&uud, &uu, &vv, SECTION_THRESHOLD)
    }
}

/// Builds, initializes and runs an integrator, then extracts both diagnostics.
pub fn simulate(settings: GridSettings) -> Result<SimulationOutput> {
    let mut model = Cgle::new(settings)?;
    model.initialize_state();
    model.run_simulation()?;
    let results = model.get_results()?;
    let poincare = model.get_poincare_section()?;
    log::debug!(
        "extracted {} window samples and {} section points",
        results.re.len(),
        poincare.len()
    );
    Ok(SimulationOutput {
        params: *model.params(),
        results,
        poincare,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        detect_crossings, section_from_series, simulate, PoincareSection, PROBE_SITE,
    };
    use crate::error::CgleError;
    use crate::integrator::Cgle;
    use crate::params::GridSettings;

    fn run(settings: GridSettings) -> Cgle {
        let mut model = Cgle::new(settings).expect("valid grid");
        model.initialize_state();
        model.run_simulation().expect("run should succeed");
        model
    }

    #[test]
    fn detect_crossings_finds_sign_changes() {
        let series = [-1.0, -0.5, 0.5, 1.0, -1.0];
        assert_eq!(detect_crossings(&series, 0.0), vec![1, 3]);
    }

    #[test]
    fn detect_crossings_ignores_monotonic_and_short_series() {
        assert!(detect_crossings(&[0.1, 0.2, 0.3, 0.4], 0.0).is_empty());
        assert!(detect_crossings(&[-3.0, -2.0, -1.0], 0.0).is_empty());
        assert!(detect_crossings(&[-1.0], 0.0).is_empty());
        assert!(detect_crossings(&[], 0.0).is_empty());
        // Landing exactly on the threshold is not a strict sign change.
        assert!(detect_crossings(&[-1.0, 0.0, 1.0], 0.0).is_empty());
    }

    #[test]
    fn section_samples_companion_crossings() {
        let companion = [-1.0, -0.5, 0.5, 1.0, -1.0];
        let x = [10.0, 11.0, 12.0, 13.0, 14.0];
        let y = [20.0, 21.0, 22.0, 23.0, 24.0];
        let section = section_from_series(&companion, &x, &y, 0.0).expect("section");
        assert_eq!(section.x, vec![11.0, 13.0]);
        assert_eq!(section.y, vec![21.0, 23.0]);
    }

    #[test]
    fn section_rejects_mismatched_or_short_samples() {
        let companion = [-1.0, 1.0];
        let err = section_from_series(&companion, &[1.0], &[], 0.0).expect_err("mismatch");
        assert!(matches!(err, CgleError::Analysis(_)));
        let err = section_from_series(&companion, &[], &[], 0.0).expect_err("no sample");
        assert!(matches!(err, CgleError::IndexOutOfRange(_)));
    }

    #[test]
    fn section_is_empty_for_monotonic_companion() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [6.0, 7.0, 8.0, 9.0, 10.0];

        let rising = [0.6, 0.7, 0.9, 1.2, 1.5];
        let section = section_from_series(&rising, &x, &y, 0.0).expect("section");
        assert!(section.x.is_empty());
        assert!(section.y.is_empty());

        let falling = [-0.1, -0.3, -0.4, -0.8, -1.5];
        let section = section_from_series(&falling, &x, &y, 0.0).expect("section");
        assert!(section.x.is_empty());
        assert!(section.y.is_empty());
    }

    #[test]
    fn split_halves_bisects_at_midpoint() {
        let section = PoincareSection {
            x: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            y: vec![-1.0, -2.0, -3.0, -4.0, -5.0],
        };
        let (first, second) = section.split_halves();
        assert_eq!(first.x, vec![1.0, 2.0]);
        assert_eq!(second.y, vec![-3.0, -4.0, -5.0]);
        let (a, b) = PoincareSection::default().split_halves();
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    fn results_have_window_shape() {
        let model = run(GridSettings::new(5, 2, 3));
        let params = *model.params();
        let results = model.get_results().expect("results");
        assert_eq!(results.u1.len(), params.segments * params.delay_steps + 1);
        assert_eq!(results.v1.len(), 7);
        assert!(results.u1.iter().all(|row| row.len() == params.n));
        assert!(results.v1.iter().all(|row| row.len() == params.n));
        assert_eq!(results.re.len(), 7);
        assert_eq!(results.im.len(), 7);

        let history = model.history().expect("initialized");
        for (t, row) in results.u1.iter().enumerate() {
            for (i, &value) in row.iter().enumerate() {
                assert_eq!(value, history.u()[(i, t + params.delay_steps)]);
            }
            assert_eq!(results.re[t], row[PROBE_SITE]);
        }
        assert_eq!(results.trace()[0].im, results.im[0]);
    }

    #[test]
    fn accessors_are_idempotent() {
        let model = run(GridSettings::new(6, 4, 5));
        assert_eq!(
            model.get_results().expect("first"),
            model.get_results().expect("second")
        );
        assert_eq!(
            model.get_poincare_section().expect("first"),
            model.get_poincare_section().expect("second")
        );
    }

    #[test]
    fn accessors_require_initialized_state() {
        let model = Cgle::new(GridSettings::new(5, 2, 3)).expect("valid grid");
        assert!(matches!(
            model.get_results(),
            Err(CgleError::Uninitialized(_))
        ));
        assert!(matches!(
            model.get_poincare_section(),
            Err(CgleError::Uninitialized(_))
        ));
    }

    #[test]
    fn short_runs_yield_empty_section() {
        // Two delay segments leave at most one companion sample.
        let model = run(GridSettings::new(5, 2, 4));
        let section = model.get_poincare_section().expect("section");
        assert!(section.is_empty());
        assert_eq!(section.x.len(), section.y.len());
    }

    #[test]
    fn oscillating_run_produces_ordered_section() {
        // The linear rotation at ω0 drives sign changes of u within a few
        // delay periods of the uniform seed.
        let output = simulate(GridSettings::new(6, 20, 40)).expect("simulation");
        let section = &output.poincare;
        assert_eq!(section.x.len(), section.y.len());
        assert!(!section.is_empty());

        let model = run(GridSettings::new(6, 20, 40));
        let delay = model.params().delay_steps;
        let t_length =
            (model.params().tau * model.params().segments as f64 / model.params().k) as usize + 1;
        let (u, v) = model
            .history()
            .expect("initialized")
            .site_series(PROBE_SITE, 0, t_length)
            .expect("series");
        let crossings = detect_crossings(&u[delay..t_length - delay], 0.0);
        assert_eq!(crossings.len(), section.len());
        for (point, &nn) in crossings.iter().enumerate() {
            assert_eq!(section.x[point], u[2 * delay + nn]);
            assert_eq!(section.y[point], v[2 * delay + nn]);
        }
    }

    #[test]
    fn simulate_reports_invalid_grids() {
        let err = simulate(GridSettings::new(2, 2, 3)).expect_err("invalid grid");
        assert!(matches!(err, CgleError::InvalidGrid(_)));
    }
}
