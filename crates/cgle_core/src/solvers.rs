use crate::error::{CgleError, Result};
use crate::history::FieldHistory;
use crate::traits::{DelayedLattice, HistoryStepper, SiteStencil};
use num_complex::Complex64;

/// Explicit forward-Euler sweep over interior sites followed by zero-gradient
/// extrapolation onto the two boundary sites.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForwardEuler;

impl ForwardEuler {
    pub fn new() -> Self {
        Self
    }
}

impl HistoryStepper for ForwardEuler {
    fn step(
        &mut self,
        system: &impl DelayedLattice,
        history: &mut FieldHistory,
        step: usize,
        dt: f64,
    ) -> Result<()> {
        let sites = system.sites();
        let delay = system.delay_steps();
        if history.sites() != sites {
            return Err(CgleError::IndexOutOfRange(format!(
                "history has {} sites, system expects {}",
                history.sites(),
                sites
            )));
        }
        if sites < 3 {
            return Err(CgleError::InvalidGrid(format!(
                "stencil needs at least 3 sites, got {sites}"
            )));
        }
        if step < delay {
            return Err(CgleError::IndexOutOfRange(format!(
                "delayed lookup at step {step} reaches before the history start (delay {delay})"
            )));
        }
        if step + 1 >= history.steps() {
            return Err(CgleError::IndexOutOfRange(format!(
                "cannot write step {} into history of {} steps",
                step + 1,
                history.steps()
            )));
        }

        let past = step - delay;
        let next = step + 1;

        // Column `next` is only written, columns `step` and `past` only read.
        for i in 1..sites - 1 {
            let stencil = SiteStencil {
                left: at(history, i - 1, step),
                center: at(history, i, step),
                right: at(history, i + 1, step),
                delayed: at(history, i, past),
            };
            let rate = system.apply(&stencil);
            history.u[(i, next)] = stencil.center.re + dt * rate.re;
            history.v[(i, next)] = stencil.center.im + dt * rate.im;
        }

        enforce_neumann(history, next)
    }
}

fn at(history: &FieldHistory, site: usize, step: usize) -> Complex64 {
    Complex64::new(history.u[(site, step)], history.v[(site, step)])
}

/// Copies the nearest interior value onto each boundary site of column `step`.
pub fn enforce_neumann(history: &mut FieldHistory, step: usize) -> Result<()> {
    if history.sites() < 2 {
        return Err(CgleError::InvalidGrid(format!(
            "boundary extrapolation needs at least 2 sites, got {}",
            history.sites()
        )));
    }
    if step >= history.steps() {
        return Err(CgleError::IndexOutOfRange(format!(
            "boundary step {step} outside history of {} steps",
            history.steps()
        )));
    }
    let last = history.sites() - 1;
    history.u[(0, step)] = history.u[(1, step)];
    history.u[(last, step)] = history.u[(last - 1, step)];
    history.v[(0, step)] = history.v[(1, step)];
    history.v[(last, step)] = history.v[(last - 1, step)];
    Ok(())
}
