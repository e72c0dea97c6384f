//! Delayed complex Ginzburg-Landau equation on a 1-D grid.
//!
//! With `z = u + i·v`, `δ²` the discrete second difference and `u_τ`, `v_τ`
//! the fields one delay period back, the model reads
//!
//! ```text
//! du/dt = r1·δ²u + (1 - ε cos β)u - (ω0 + ε sin β)v + ε cos β·u_τ + ε sin β·v_τ
//!         - (u² + v²)u + α(v³ + u²v)
//! dv/dt = r1·δ²v + (ω0 + ε sin β)u + (1 - ε cos β)v - ε sin β·u_τ + ε cos β·v_τ
//!         - (u² + v²)v - α(u³ - v²u)
//! ```
//!
//! The linear and delayed parts combine to `(1 + iω0)z + ε e^{-iβ}(z_τ - z)`.
//! Both fields are advanced with forward Euler. The delay `τ` spans exactly
//! `N` time steps, so the full history is retained and the feedback term reads
//! column `j - N` directly.

use crate::error::{CgleError, Result};
use crate::history::FieldHistory;
use crate::params::{CgleParameters, GridSettings, PhysicalConstants, SEED_VALUE};
use crate::solvers::ForwardEuler;
use crate::traits::{DelayedLattice, HistoryStepper, SiteStencil};
use num_complex::Complex64;

/// Right-hand side of the delayed CGLE with its trigonometric factors cached.
#[derive(Debug, Clone, Copy)]
pub struct CgleSystem {
    sites: usize,
    delay_steps: usize,
    r1: f64,
    omega0: f64,
    alpha: f64,
    gain_cos: f64,
    gain_sin: f64,
}

impl CgleSystem {
    pub fn new(params: &CgleParameters) -> Self {
        Self {
            sites: params.n,
            delay_steps: params.delay_steps,
            r1: params.r1,
            omega0: params.omega0,
            alpha: params.alpha,
            gain_cos: params.epsilon * params.beta.cos(),
            gain_sin: params.epsilon * params.beta.sin(),
        }
    }
}

impl DelayedLattice for CgleSystem {
    fn sites(&self) -> usize {
        self.sites
    }

    fn delay_steps(&self) -> usize {
        self.delay_steps
    }

    fn apply(&self, stencil: &SiteStencil) -> Complex64 {
        let (u, v) = (stencil.center.re, stencil.center.im);
        let (ud, vd) = (stencil.delayed.re, stencil.delayed.im);
        let modulus_sq = u.powi(2) + v.powi(2);

        let du = self.r1 * (stencil.right.re - 2.0 * u + stencil.left.re)
            + (1.0 - self.gain_cos) * u
            - (self.omega0 + self.gain_sin) * v
            + self.gain_cos * ud
            + self.gain_sin * vd
            - modulus_sq * u
            + self.alpha * v.powi(3)
            + self.alpha * u.powi(2) * v;

        let dv = self.r1 * (stencil.right.im - 2.0 * v + stencil.left.im)
            + (self.omega0 + self.gain_sin) * u
            + (1.0 - self.gain_cos) * v
            - self.gain_sin * ud
            + self.gain_cos * vd
            - modulus_sq * v
            - self.alpha * u.powi(3)
            + self.alpha * v.powi(2) * u;

        Complex64::new(du, dv)
    }
}

/// Integrator owning the parameters and the complete space–time history.
#[derive(Debug, Clone)]
pub struct Cgle {
    params: CgleParameters,
    system: CgleSystem,
    state: Option<FieldHistory>,
}

impl Cgle {
    pub fn new(settings: GridSettings) -> Result<Self> {
        Self::with_constants(settings, PhysicalConstants::default())
    }

    pub fn with_constants(settings: GridSettings, constants: PhysicalConstants) -> Result<Self> {
        let params = CgleParameters::derive(settings, constants)?;
        Ok(Self {
            system: CgleSystem::new(&params),
            params,
            state: None,
        })
    }

    pub fn params(&self) -> &CgleParameters {
        &self.params
    }

    pub fn system(&self) -> &CgleSystem {
        &self.system
    }

    /// Allocates both `n × m` fields and fills them with the seed value,
    /// which also serves as the constant pre-history for the delay term.
    /// Calling it again discards any previous run.
    pub fn initialize_state(&mut self) {
        self.state = Some(FieldHistory::seeded(
            self.params.n,
            self.params.m,
            SEED_VALUE,
        ));
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Read access to the retained history.
    pub fn history(&self) -> Result<&FieldHistory> {
        self.state.as_ref().ok_or_else(|| {
            CgleError::Uninitialized("call initialize_state before reading the history.".into())
        })
    }

    /// Marches `j` from `N` to `m - 2`, filling columns `N + 1 ..= m - 1`.
    pub fn run_simulation(&mut self) -> Result<()> {
        let history = self.state.as_mut().ok_or_else(|| {
            CgleError::Uninitialized("call initialize_state before run_simulation.".into())
        })?;
        let CgleParameters {
            n,
            m,
            p,
            delay_steps,
            k,
            ..
        } = self.params;
        if history.sites() != n || history.steps() != m {
            return Err(CgleError::IndexOutOfRange(format!(
                "history shape {}x{} does not match grid {}x{}",
                history.sites(),
                history.steps(),
                n,
                m
            )));
        }

        log::debug!("running delayed CGLE: {} steps over {} sites", m - p, n);
        let mut stepper = ForwardEuler::new();
        for j in (p - 1)..(m - 1) {
            stepper.step(&self.system, history, j, k)?;
        }

        if !history.is_finite() {
            log::warn!("CGLE history contains non-finite values; the scheme diverged");
        }
        log::debug!("delayed CGLE run finished");
        Ok(())
    }
}
