/// The `cgle_core` crate integrates a time-delayed complex Ginzburg-Landau
/// equation on a 1-D grid and derives diagnostics from the trajectory.
///
/// Key components:
/// - **Params**: `GridSettings`, `PhysicalConstants` and the derived `CgleParameters`.
/// - **Traits**: `DelayedLattice` (site right-hand side) and `HistoryStepper` (schemes).
/// - **Solvers**: `ForwardEuler` with zero-gradient boundary extrapolation.
/// - **Integrator**: `Cgle`, owning the full space–time history of `u` and `v`.
/// - **Analysis**: steady-state window extraction, Poincaré sections and `simulate`.
/// - **Spectrum**: FFT-based frequency estimate of a sampled trace.
pub mod analysis;
pub mod error;
pub mod history;
pub mod integrator;
pub mod params;
pub mod solvers;
pub mod spectrum;
pub mod traits;

pub use analysis::{simulate, PoincareSection, ResultBundle, SimulationOutput};
pub use error::{CgleError, Result};
pub use integrator::Cgle;
pub use params::{CgleParameters, GridSettings, PhysicalConstants};
