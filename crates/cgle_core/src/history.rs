//! Space–time storage for the two real fields of the order parameter.

use crate::error::{CgleError, Result};
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Full retained history of `u` (real part) and `v` (imaginary part).
///
/// Rows are spatial points, columns are time steps, so every time column is
/// contiguous in nalgebra's column-major layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldHistory {
    pub(crate) u: DMatrix<f64>,
    pub(crate) v: DMatrix<f64>,
}

impl FieldHistory {
    /// Allocates `sites × steps` arrays with every entry set to `seed`.
    pub fn seeded(sites: usize, steps: usize, seed: f64) -> Self {
        Self {
            u: DMatrix::from_element(sites, steps, seed),
            v: DMatrix::from_element(sites, steps, seed),
        }
    }

    pub fn sites(&self) -> usize {
        self.u.nrows()
    }

    pub fn steps(&self) -> usize {
        self.u.ncols()
    }

    pub fn u(&self) -> &DMatrix<f64> {
        &self.u
    }

    pub fn v(&self) -> &DMatrix<f64> {
        &self.v
    }

    fn check(&self, site: usize, step: usize) -> Result<()> {
        if site >= self.sites() || step >= self.steps() {
            return Err(CgleError::IndexOutOfRange(format!(
                "({site}, {step}) outside history of shape {}x{}",
                self.sites(),
                self.steps()
            )));
        }
        Ok(())
    }

    /// `u + i·v` at one grid point and time step.
    pub fn amplitude(&self, site: usize, step: usize) -> Result<Complex64> {
        self.check(site, step)?;
        Ok(Complex64::new(self.u[(site, step)], self.v[(site, step)]))
    }

    /// Copies `u[site][start..end]` and `v[site][start..end]`.
    pub fn site_series(
        &self,
        site: usize,
        start: usize,
        end: usize,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        if start > end {
            return Err(CgleError::IndexOutOfRange(format!(
                "series start {start} exceeds end {end}"
            )));
        }
        if site >= self.sites() || end > self.steps() {
            return Err(CgleError::IndexOutOfRange(format!(
                "series {site}[{start}..{end}] outside history of shape {}x{}",
                self.sites(),
                self.steps()
            )));
        }
        let u = (start..end).map(|step| self.u[(site, step)]).collect();
        let v = (start..end).map(|step| self.v[(site, step)]).collect();
        Ok((u, v))
    }

    /// True when every stored value is finite.
    pub fn is_finite(&self) -> bool {
        self.u.iter().chain(self.v.iter()).all(|value| value.is_finite())
    }
}
