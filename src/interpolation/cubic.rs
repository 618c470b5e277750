//! Cubic interpolation on regular 1D grids.

use super::{
    check_axis_size, fip, power_vector, power_vector_derivative,
    power_vector_second_derivative, Interpolator1, HERMITE_BASIS,
};
use crate::{
    error::{ConstructionError, ConstructionResult},
    grid::{fgr, RegularGrid1},
    num::SplineFloat,
    stencil,
};
use ndarray::prelude::*;
use num::cast::AsPrimitive;

/// A piecewise-cubic interpolator over a regular 1D grid.
///
/// Each grid cell carries power-basis coefficients (c0, c1, c2, c3) such
/// that the interpolated value at local coordinate x̄ is
/// c0 + c1·x̄ + c2·x̄² + c3·x̄³. The coefficients are derived from 4th-order
/// finite-difference derivative estimates at the cell corners, giving a
/// patchwork that is continuous in value and first derivative.
#[derive(Clone, Debug)]
pub struct CubicInterpolator {
    grid: RegularGrid1,
    coefficients: Array2<fgr>,
}

impl CubicInterpolator {
    /// Creates a new cubic interpolator from uniformly spaced sample
    /// coordinates and the sampled values.
    ///
    /// Coordinates supplied in decreasing order are reversed together with
    /// the values, so the evaluated interpolant is invariant under the
    /// ordering of the input.
    pub fn from_coords<F: SplineFloat>(x: &[fgr], values: &[F]) -> ConstructionResult<Self> {
        if x.len() != values.len() {
            return Err(ConstructionError::ShapeMismatch {
                expected: format!("{} values", x.len()),
                actual: format!("{} values", values.len()),
                context: "cubic interpolator",
            });
        }
        check_axis_size(x.len(), "cubic interpolator x-axis")?;

        let mut values: Vec<fgr> = values.iter().map(|&value| value.as_()).collect();
        let grid = if x[0] > x[1] {
            values.reverse();
            let mut x = x.to_vec();
            x.reverse();
            RegularGrid1::from_coords(&x)
        } else {
            RegularGrid1::from_coords(x)
        };

        Ok(Self::build(grid, &values))
    }

    /// Creates a new cubic interpolator from the coordinate of the first
    /// sample, the grid spacing and the sampled values.
    pub fn from_start_and_spacing<F: SplineFloat>(
        x_start: fgr,
        dx: fgr,
        values: &[F],
    ) -> ConstructionResult<Self> {
        check_axis_size(values.len(), "cubic interpolator x-axis")?;
        let values: Vec<fgr> = values.iter().map(|&value| value.as_()).collect();
        Ok(Self::build(
            RegularGrid1::new(x_start, dx, values.len() - 1),
            &values,
        ))
    }

    /// Creates a cubic interpolator directly from an already assembled
    /// per-cell coefficient store.
    pub(crate) fn from_coefficients(grid: RegularGrid1, coefficients: Array2<fgr>) -> Self {
        assert_eq!(coefficients.dim(), (grid.n_cells(), 4));
        Self { grid, coefficients }
    }

    /// Replaces the interpolant with one built from the given samples.
    ///
    /// The new coefficient store is built in full before the old one is
    /// swapped out, so a failed reconstruction leaves the interpolator
    /// unchanged and usable.
    pub fn reconstruct<F: SplineFloat>(
        &mut self,
        x: &[fgr],
        values: &[F],
    ) -> ConstructionResult<()> {
        *self = Self::from_coords(x, values)?;
        Ok(())
    }

    /// Returns a reference to the underlying grid.
    pub fn grid(&self) -> &RegularGrid1 {
        &self.grid
    }

    fn build(grid: RegularGrid1, values: &[fgr]) -> Self {
        let n = values.len();
        let mut derivatives = Array1::zeros(n);
        stencil::first_derivative_into(ArrayView1::from(values), derivatives.view_mut());

        let mut coefficients = Array2::zeros((n - 1, 4));
        for (i, mut cell) in coefficients.outer_iter_mut().enumerate() {
            let hermite = [values[i], values[i + 1], derivatives[i], derivatives[i + 1]];
            for k in 0..4 {
                cell[k] = HERMITE_BASIS[k]
                    .iter()
                    .zip(hermite.iter())
                    .map(|(&basis, &data)| basis * data)
                    .sum();
            }
        }

        Self { grid, coefficients }
    }

    fn contract(&self, cell_idx: usize, x_powers: &[fgr; 4]) -> fgr {
        let cell = self.coefficients.row(cell_idx);
        (0..4).map(|k| cell[k] * x_powers[k]).sum()
    }
}

impl Interpolator1 for CubicInterpolator {
    fn evaluate(&self, x: fgr) -> fip {
        let cell_idx = self.grid.find_closest_grid_cell(x);
        let xbar = self.grid.cell_local_coord(cell_idx, x);
        self.contract(cell_idx, &power_vector(xbar)) as fip
    }

    fn derivative(&self, x: fgr) -> fip {
        let cell_idx = self.grid.find_closest_grid_cell(x);
        let xbar = self.grid.cell_local_coord(cell_idx, x);
        (self.contract(cell_idx, &power_vector_derivative(xbar)) / self.grid.cell_extent()) as fip
    }

    fn second_derivative(&self, x: fgr) -> fip {
        let cell_idx = self.grid.find_closest_grid_cell(x);
        let xbar = self.grid.cell_local_coord(cell_idx, x);
        let dx = self.grid.cell_extent();
        (self.contract(cell_idx, &power_vector_second_derivative(xbar)) / (dx * dx)) as fip
    }
}
