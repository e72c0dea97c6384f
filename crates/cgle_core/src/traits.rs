use crate::error::Result;
use crate::history::FieldHistory;
use num_complex::Complex64;

/// Values of the order parameter `u + i·v` that one interior site reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteStencil {
    /// Left neighbour at the current step.
    pub left: Complex64,
    /// The site itself at the current step.
    pub center: Complex64,
    /// Right neighbour at the current step.
    pub right: Complex64,
    /// The site one delay period in the past.
    pub delayed: Complex64,
}

/// A 1-D lattice whose local dynamics depend on a delayed copy of itself.
pub trait DelayedLattice {
    /// Number of lattice sites, boundaries included.
    fn sites(&self) -> usize;

    /// Delay expressed in time steps.
    fn delay_steps(&self) -> usize;

    /// Evaluates the right-hand side `d(u + i·v)/dt` at an interior site.
    fn apply(&self, stencil: &SiteStencil) -> Complex64;
}

/// A scheme that fills the next column of a retained history.
pub trait HistoryStepper {
    /// Writes column `step + 1` of `history` from columns `step` and
    /// `step - delay_steps`.
    fn step(
        &mut self,
        system: &impl DelayedLattice,
        history: &mut FieldHistory,
        step: usize,
        dt: f64,
    ) -> Result<()>;
}
