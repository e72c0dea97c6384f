//! Physical constants and grid quantities derived from them.

use crate::error::{CgleError, Result};
use serde::{Deserialize, Serialize};

/// π as used by the discretization.
pub const PI: f64 = std::f64::consts::PI;

/// Uniform value written to every history entry before stepping.
pub const SEED_VALUE: f64 = 0.01;

/// Grid resolution requested by the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridSettings {
    /// Number of spatial grid points `n`.
    pub space_steps: usize,
    /// Number of delay-length segments `M` simulated after the pre-history.
    pub time_segments: usize,
    /// Time steps per delay period `N`.
    pub segment_steps: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            space_steps: 20,
            time_segments: 500,
            segment_steps: 200,
        }
    }
}

impl GridSettings {
    pub fn new(space_steps: usize, time_segments: usize, segment_steps: usize) -> Self {
        Self {
            space_steps,
            time_segments,
            segment_steps,
        }
    }

    /// Resolution used by the `cgle` binary: 80 segments instead of 500.
    pub fn entry_point() -> Self {
        Self {
            time_segments: 80,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.space_steps < 3 {
            return Err(CgleError::InvalidGrid(format!(
                "space_steps must be at least 3 to hold an interior point, got {}.",
                self.space_steps
            )));
        }
        if self.segment_steps == 0 {
            return Err(CgleError::InvalidGrid(
                "segment_steps must be at least 1.".to_string(),
            ));
        }
        if self.time_segments == 0 {
            return Err(CgleError::InvalidGrid(
                "time_segments must be at least 1 so the history exceeds two delay periods."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Fixed physical constants of the delayed CGLE.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PhysicalConstants {
    pub omega0: f64,
    /// Domain length factor.
    pub l: f64,
    /// Feedback phase.
    pub beta: f64,
    /// Cubic cross-coupling coefficient.
    pub alpha: f64,
    /// Critical feedback gain.
    pub epc: f64,
    /// Critical delay.
    pub tauc: f64,
    /// Perturbation of the gain away from `epc`.
    pub mu1: f64,
    /// Perturbation of the delay away from `tauc`.
    pub mu2: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            omega0: 1.6512,
            l: 2.0 * PI,
            beta: PI / 15.0,
            alpha: 1.0,
            epc: 0.92363,
            tauc: 1.59602,
            mu1: -0.003,
            mu2: -0.005,
        }
    }
}

impl PhysicalConstants {
    pub fn epsilon(&self) -> f64 {
        self.epc + self.mu1
    }

    pub fn tau(&self) -> f64 {
        self.tauc + self.mu2
    }
}

/// Every scalar the integrator and post-processing read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CgleParameters {
    pub omega0: f64,
    pub l: f64,
    pub beta: f64,
    pub alpha: f64,
    pub epsilon: f64,
    pub tau: f64,
    /// Spatial points.
    pub n: usize,
    /// Delay-length segments.
    #[serde(rename = "M")]
    pub segments: usize,
    /// Steps per delay period.
    #[serde(rename = "N")]
    pub delay_steps: usize,
    /// Spatial step.
    pub hh: f64,
    /// Time step, `tau / N`.
    pub k: f64,
    /// Stored time columns, `N + M·N + 1`.
    pub m: usize,
    /// First column produced by stepping.
    pub p: usize,
    /// Diffusion number `k / hh²`.
    pub r1: f64,
}

impl CgleParameters {
    /// Validates `settings` and derives grid quantities from `constants`.
    pub fn derive(settings: GridSettings, constants: PhysicalConstants) -> Result<Self> {
        settings.validate()?;

        let n = settings.space_steps;
        let segments = settings.time_segments;
        let delay_steps = settings.segment_steps;

        let tau = constants.tau();
        let hh = constants.l * PI / (n - 1) as f64;
        let k = tau / delay_steps as f64;
        let window_len = segments
            .checked_mul(delay_steps)
            .and_then(|steps| steps.checked_add(1))
            .ok_or_else(|| {
                CgleError::InvalidGrid(format!(
                    "time_segments × segment_steps ({segments} × {delay_steps}) overflows the step index."
                ))
            })?;
        let m = window_len.checked_add(delay_steps).ok_or_else(|| {
            CgleError::InvalidGrid(format!(
                "history length {delay_steps} + {window_len} overflows the step index."
            ))
        })?;
        let r1 = k / hh.powi(2);

        let params = Self {
            omega0: constants.omega0,
            l: constants.l,
            beta: constants.beta,
            alpha: constants.alpha,
            epsilon: constants.epsilon(),
            tau,
            n,
            segments,
            delay_steps,
            hh,
            k,
            m,
            p: delay_steps + 1,
            r1,
        };
        log::debug!(
            "derived CGLE parameters: n={} m={} N={} k={:.6e} hh={:.6e} r1={:.6e}",
            params.n,
            params.m,
            params.delay_steps,
            params.k,
            params.hh,
            params.r1
        );
        Ok(params)
    }

    pub fn from_settings(settings: GridSettings) -> Result<Self> {
        Self::derive(settings, PhysicalConstants::default())
    }

    /// Length of the post-transient window, `M·N + 1`.
    pub fn window_len(&self) -> usize {
        self.m - self.delay_steps
    }
}
