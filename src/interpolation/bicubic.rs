//! Bicubic interpolation on regular 2D grids.

use super::{
    check_axis_size, cubic::CubicInterpolator, fip, power_vector, power_vector_derivative,
    power_vector_second_derivative, Interpolator2, HERMITE_BASIS,
};
use crate::{
    error::{ConstructionError, ConstructionResult},
    grid::{fgr, RegularGrid1, RegularGrid2},
    num::SplineFloat,
    stencil::{self, CrossDerivativeScheme},
};
use ndarray::prelude::*;
use num::cast::AsPrimitive;
use rayon::prelude::*;

/// Memory layout of a flattened 2D sample array.
///
/// The layout must be stated explicitly by the caller; it is never inferred
/// from the array dimensions, since both layouts are plausible for square
/// grids but give different interpolants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleLayout {
    /// `z[i*y.len() + j]` holds the sample at `(x[i], y[j])`.
    XMajor,
    /// `z[j*x.len() + i]` holds the sample at `(x[i], y[j])`.
    YMajor,
}

/// Configuration parameters for bicubic grid interpolators.
#[derive(Clone, Debug)]
pub struct BicubicInterpolatorConfig {
    /// Scheme used to estimate the mixed (xy) derivative at grid nodes.
    pub cross_derivative_scheme: CrossDerivativeScheme,
}

impl BicubicInterpolatorConfig {
    pub const DEFAULT_CROSS_DERIVATIVE_SCHEME: CrossDerivativeScheme =
        CrossDerivativeScheme::ComposedFourthOrder;
}

impl Default for BicubicInterpolatorConfig {
    fn default() -> Self {
        BicubicInterpolatorConfig {
            cross_derivative_scheme: Self::DEFAULT_CROSS_DERIVATIVE_SCHEME,
        }
    }
}

/// Dense storage of the power-basis coefficient blocks for every grid cell.
///
/// Each cell owns a row of 16 coefficients holding its 4×4 block in
/// row-major order, so the coefficient with power k in x and l in y sits at
/// offset `4*k + l` regardless of how the blocks themselves are laid out.
#[derive(Clone, Debug)]
struct CoefficientStore {
    blocks: Array2<fgr>,
    n_cells_y: usize,
}

impl CoefficientStore {
    fn block(&self, i: usize, j: usize) -> ArrayView1<'_, fgr> {
        self.blocks.row(i * self.n_cells_y + j)
    }

    /// Evaluates the bilinear form xᵗ·C·y of the block for cell (i, j) with
    /// the given power vectors.
    fn contract(&self, i: usize, j: usize, x_powers: &[fgr; 4], y_powers: &[fgr; 4]) -> fgr {
        let block = self.block(i, j);
        let mut result = 0.0;
        for k in 0..4 {
            let mut inner = 0.0;
            for l in 0..4 {
                inner += block[4 * k + l] * y_powers[l];
            }
            result += x_powers[k] * inner;
        }
        result
    }
}

/// A bicubic interpolator over a regular 2D grid.
///
/// Construction estimates derivative grids with 4th-order finite-difference
/// stencils and assembles one Hermite coefficient block per grid cell; both
/// passes run in parallel over disjoint output regions. Queries only locate
/// the (clamped) cell and evaluate the local polynomial, so a fully built
/// interpolator can be shared freely between reader threads.
#[derive(Clone, Debug)]
pub struct BicubicInterpolator {
    grid: RegularGrid2,
    coefficients: CoefficientStore,
    config: BicubicInterpolatorConfig,
}

impl BicubicInterpolator {
    /// Creates a new bicubic interpolator from uniformly spaced sample
    /// coordinates along each axis and a matrix of sampled values.
    ///
    /// The value matrix must have shape `(x.len(), y.len())`, with rows
    /// indexing x, or the transposed shape, in which case it is transposed
    /// into place. Any other shape is a shape mismatch error. Coordinate
    /// axes supplied in decreasing order are reversed together with the
    /// corresponding axis of the value matrix.
    pub fn from_coords<F: SplineFloat>(
        x: &[fgr],
        y: &[fgr],
        z: &Array2<F>,
    ) -> ConstructionResult<Self> {
        Self::from_coords_with_config(x, y, z, BicubicInterpolatorConfig::default())
    }

    /// Like [`Self::from_coords`], with explicit configuration parameters.
    pub fn from_coords_with_config<F: SplineFloat>(
        x: &[fgr],
        y: &[fgr],
        z: &Array2<F>,
        config: BicubicInterpolatorConfig,
    ) -> ConstructionResult<Self> {
        let z = if z.dim() == (x.len(), y.len()) {
            z.mapv(|value| value.as_())
        } else if z.dim() == (y.len(), x.len()) {
            z.t().mapv(|value| value.as_())
        } else {
            return Err(ConstructionError::ShapeMismatch {
                expected: format!(
                    "({}, {}) or ({}, {})",
                    x.len(),
                    y.len(),
                    y.len(),
                    x.len()
                ),
                actual: format!("({}, {})", z.nrows(), z.ncols()),
                context: "bicubic interpolator",
            });
        };
        check_axis_size(x.len(), "bicubic interpolator x-axis")?;
        check_axis_size(y.len(), "bicubic interpolator y-axis")?;

        let (x, y, z) = normalize_axis_directions(x, y, z);
        let grid = RegularGrid2::new(RegularGrid1::from_coords(&x), RegularGrid1::from_coords(&y));
        Ok(Self::build(grid, &z, config))
    }

    /// Creates a new bicubic interpolator from a flattened sample array
    /// with the given explicit memory layout.
    pub fn from_flat<F: SplineFloat>(
        x: &[fgr],
        y: &[fgr],
        z: &[F],
        layout: SampleLayout,
    ) -> ConstructionResult<Self> {
        Self::from_flat_with_config(x, y, z, layout, BicubicInterpolatorConfig::default())
    }

    /// Like [`Self::from_flat`], with explicit configuration parameters.
    pub fn from_flat_with_config<F: SplineFloat>(
        x: &[fgr],
        y: &[fgr],
        z: &[F],
        layout: SampleLayout,
        config: BicubicInterpolatorConfig,
    ) -> ConstructionResult<Self> {
        if z.len() != x.len() * y.len() {
            return Err(ConstructionError::ShapeMismatch {
                expected: format!("{} values", x.len() * y.len()),
                actual: format!("{} values", z.len()),
                context: "bicubic interpolator",
            });
        }
        let values: Vec<fgr> = z.iter().map(|&value| value.as_()).collect();
        let z = match layout {
            SampleLayout::XMajor => Array2::from_shape_vec((x.len(), y.len()), values),
            SampleLayout::YMajor => {
                Array2::from_shape_vec((y.len(), x.len()), values).map(|z| z.reversed_axes())
            }
        }
        .expect("Sample count was already validated against the grid shape.");
        Self::from_coords_with_config(x, y, &z, config)
    }

    /// Creates a new bicubic interpolator from the coordinates of the first
    /// sample, the grid spacings and a value matrix of shape
    /// `(x count, y count)` with rows indexing x.
    pub fn from_start_and_spacing<F: SplineFloat>(
        x_start: fgr,
        dx: fgr,
        y_start: fgr,
        dy: fgr,
        z: &Array2<F>,
    ) -> ConstructionResult<Self> {
        check_axis_size(z.nrows(), "bicubic interpolator x-axis")?;
        check_axis_size(z.ncols(), "bicubic interpolator y-axis")?;
        let grid = RegularGrid2::new(
            RegularGrid1::new(x_start, dx, z.nrows() - 1),
            RegularGrid1::new(y_start, dy, z.ncols() - 1),
        );
        Ok(Self::build(
            grid,
            &z.mapv(|value| value.as_()),
            BicubicInterpolatorConfig::default(),
        ))
    }

    /// Replaces the interpolant with one built from the given samples,
    /// reusing the existing configuration.
    ///
    /// The new coefficient store is built in full before the old one is
    /// swapped out, so a failed reconstruction leaves the interpolator
    /// unchanged and usable.
    pub fn reconstruct<F: SplineFloat>(
        &mut self,
        x: &[fgr],
        y: &[fgr],
        z: &Array2<F>,
    ) -> ConstructionResult<()> {
        *self = Self::from_coords_with_config(x, y, z, self.config.clone())?;
        Ok(())
    }

    /// Returns a reference to the underlying grid.
    pub fn grid(&self) -> &RegularGrid2 {
        &self.grid
    }

    /// Returns a reference to the configuration parameters.
    pub fn config(&self) -> &BicubicInterpolatorConfig {
        &self.config
    }

    /// Collapses the x-axis at the given coordinate, producing an
    /// independently owned cubic interpolator over y.
    ///
    /// Every y-cell's coefficients are obtained by contracting the x power
    /// vector through the corresponding 2D block, so for any y the reduced
    /// interpolator agrees with `evaluate(x, y)` of this interpolator.
    pub fn reduce_x(&self, x: fgr) -> CubicInterpolator {
        let i = self.grid.x().find_closest_grid_cell(x);
        let x_powers = power_vector(self.grid.x().cell_local_coord(i, x));
        let n_cells_y = self.grid.y().n_cells();

        let mut coefficients = Array2::zeros((n_cells_y, 4));
        for j in 0..n_cells_y {
            let block = self.coefficients.block(i, j);
            for k in 0..4 {
                coefficients[[j, k]] = (0..4).map(|l| x_powers[l] * block[4 * l + k]).sum();
            }
        }
        CubicInterpolator::from_coefficients(self.grid.y().clone(), coefficients)
    }

    /// Collapses the y-axis at the given coordinate, producing an
    /// independently owned cubic interpolator over x.
    pub fn reduce_y(&self, y: fgr) -> CubicInterpolator {
        let j = self.grid.y().find_closest_grid_cell(y);
        let y_powers = power_vector(self.grid.y().cell_local_coord(j, y));
        let n_cells_x = self.grid.x().n_cells();

        let mut coefficients = Array2::zeros((n_cells_x, 4));
        for i in 0..n_cells_x {
            let block = self.coefficients.block(i, j);
            for k in 0..4 {
                coefficients[[i, k]] = (0..4).map(|l| block[4 * k + l] * y_powers[l]).sum();
            }
        }
        CubicInterpolator::from_coefficients(self.grid.x().clone(), coefficients)
    }

    fn build(grid: RegularGrid2, z: &Array2<fgr>, config: BicubicInterpolatorConfig) -> Self {
        let zx = stencil::first_derivative_grid(z.view(), Axis(0));
        let zy = stencil::first_derivative_grid(z.view(), Axis(1));
        let zxy = match config.cross_derivative_scheme {
            CrossDerivativeScheme::ComposedFourthOrder => {
                stencil::first_derivative_grid(zy.view(), Axis(0))
            }
            CrossDerivativeScheme::LowOrderCentral => {
                let zy_low = stencil::low_order_derivative_grid(z.view(), Axis(1));
                stencil::low_order_derivative_grid(zy_low.view(), Axis(0))
            }
        };

        let n_cells_y = grid.y().n_cells();
        let n_cells = grid.x().n_cells() * n_cells_y;
        let mut blocks = Array2::zeros((n_cells, 16));

        blocks
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(cell_idx, mut block)| {
                let i = cell_idx / n_cells_y;
                let j = cell_idx % n_cells_y;

                // Corner data matrix D with rows [(f, fy) at x = i, i+1]
                // stacked over [(fx, fxy) at x = i, i+1].
                let data = [
                    [z[[i, j]], z[[i, j + 1]], zy[[i, j]], zy[[i, j + 1]]],
                    [
                        z[[i + 1, j]],
                        z[[i + 1, j + 1]],
                        zy[[i + 1, j]],
                        zy[[i + 1, j + 1]],
                    ],
                    [zx[[i, j]], zx[[i, j + 1]], zxy[[i, j]], zxy[[i, j + 1]]],
                    [
                        zx[[i + 1, j]],
                        zx[[i + 1, j + 1]],
                        zxy[[i + 1, j]],
                        zxy[[i + 1, j + 1]],
                    ],
                ];

                // C = L·D·Lᵗ, applying the Hermite transform along each axis.
                let mut left = [[0.0; 4]; 4];
                for k in 0..4 {
                    for l in 0..4 {
                        left[k][l] = (0..4).map(|m| HERMITE_BASIS[k][m] * data[m][l]).sum();
                    }
                }
                for k in 0..4 {
                    for l in 0..4 {
                        block[4 * k + l] = (0..4).map(|m| left[k][m] * HERMITE_BASIS[l][m]).sum();
                    }
                }
            });

        Self {
            grid,
            coefficients: CoefficientStore { blocks, n_cells_y },
            config,
        }
    }

    fn locate(&self, x: fgr, y: fgr) -> (usize, usize, fgr, fgr) {
        let i = self.grid.x().find_closest_grid_cell(x);
        let j = self.grid.y().find_closest_grid_cell(y);
        (
            i,
            j,
            self.grid.x().cell_local_coord(i, x),
            self.grid.y().cell_local_coord(j, y),
        )
    }
}

impl Interpolator2 for BicubicInterpolator {
    fn evaluate(&self, x: fgr, y: fgr) -> fip {
        let (i, j, xbar, ybar) = self.locate(x, y);
        self.coefficients
            .contract(i, j, &power_vector(xbar), &power_vector(ybar)) as fip
    }

    fn derivative_x(&self, x: fgr, y: fgr) -> fip {
        let (i, j, xbar, ybar) = self.locate(x, y);
        (self
            .coefficients
            .contract(i, j, &power_vector_derivative(xbar), &power_vector(ybar))
            / self.grid.x().cell_extent()) as fip
    }

    fn derivative_y(&self, x: fgr, y: fgr) -> fip {
        let (i, j, xbar, ybar) = self.locate(x, y);
        (self
            .coefficients
            .contract(i, j, &power_vector(xbar), &power_vector_derivative(ybar))
            / self.grid.y().cell_extent()) as fip
    }

    fn derivative_xy(&self, x: fgr, y: fgr) -> fip {
        let (i, j, xbar, ybar) = self.locate(x, y);
        (self.coefficients.contract(
            i,
            j,
            &power_vector_derivative(xbar),
            &power_vector_derivative(ybar),
        ) / (self.grid.x().cell_extent() * self.grid.y().cell_extent())) as fip
    }

    fn derivative_xx(&self, x: fgr, y: fgr) -> fip {
        let (i, j, xbar, ybar) = self.locate(x, y);
        let dx = self.grid.x().cell_extent();
        (self.coefficients.contract(
            i,
            j,
            &power_vector_second_derivative(xbar),
            &power_vector(ybar),
        ) / (dx * dx)) as fip
    }

    fn derivative_yy(&self, x: fgr, y: fgr) -> fip {
        let (i, j, xbar, ybar) = self.locate(x, y);
        let dy = self.grid.y().cell_extent();
        (self.coefficients.contract(
            i,
            j,
            &power_vector(xbar),
            &power_vector_second_derivative(ybar),
        ) / (dy * dy)) as fip
    }
}

fn normalize_axis_directions(
    x: &[fgr],
    y: &[fgr],
    mut z: Array2<fgr>,
) -> (Vec<fgr>, Vec<fgr>, Array2<fgr>) {
    let mut x = x.to_vec();
    let mut y = y.to_vec();
    if x[0] > x[1] {
        x.reverse();
        z.invert_axis(Axis(0));
    }
    if y[0] > y[1] {
        y.reverse();
        z.invert_axis(Axis(1));
    }
    (x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::Interpolator1;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn quadratic_product_samples() -> (Vec<fgr>, Vec<fgr>, Array2<fgr>) {
        let x: Vec<fgr> = (0..6).map(|i| i as fgr).collect();
        let y = x.clone();
        let z = Array2::from_shape_fn((6, 6), |(i, j)| ((i * i) * (j * j)) as fgr);
        (x, y, z)
    }

    fn wave_samples(n_x: usize, n_y: usize) -> (Vec<fgr>, Vec<fgr>, Array2<fgr>) {
        let x: Vec<fgr> = (0..n_x).map(|i| 0.5 * i as fgr).collect();
        let y: Vec<fgr> = (0..n_y).map(|j| 0.5 * j as fgr).collect();
        let z = Array2::from_shape_fn((n_x, n_y), |(i, j)| x[i].sin() * y[j].cos());
        (x, y, z)
    }

    #[test]
    fn quadratic_product_is_reproduced() {
        let (x, y, z) = quadratic_product_samples();
        let interpolator = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();

        assert_abs_diff_eq!(interpolator.evaluate(2.5, 2.5), 39.0625, epsilon = 1e-8);
        assert_abs_diff_eq!(interpolator.derivative_x(2.5, 2.5), 31.25, epsilon = 1e-6);
        assert_abs_diff_eq!(interpolator.derivative_y(2.5, 2.5), 31.25, epsilon = 1e-6);
        assert_abs_diff_eq!(interpolator.derivative_xy(2.5, 2.5), 25.0, epsilon = 1e-6);
        assert_abs_diff_eq!(interpolator.derivative_xx(2.5, 2.5), 12.5, epsilon = 1e-6);
        assert_abs_diff_eq!(interpolator.derivative_yy(2.5, 2.5), 12.5, epsilon = 1e-6);
    }

    #[test]
    fn separable_cubics_are_reproduced_everywhere() {
        let x: Vec<fgr> = (0..7).map(|i| i as fgr).collect();
        let y: Vec<fgr> = (0..8).map(|j| j as fgr).collect();
        let fx = |x: fgr| x * x * x - x;
        let fy = |y: fgr| y * y * y + 2.0 * y * y;
        let z = Array2::from_shape_fn((7, 8), |(i, j)| fx(x[i]) * fy(y[j]));
        let interpolator = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();

        for &xq in &[0.0, 0.31, 2.5, 5.93] {
            for &yq in &[0.0, 0.77, 3.5, 6.99] {
                assert_relative_eq!(
                    interpolator.evaluate(xq, yq),
                    fx(xq) * fy(yq),
                    max_relative = 1e-9,
                    epsilon = 1e-9
                );
                assert_relative_eq!(
                    interpolator.derivative_x(xq, yq),
                    (3.0 * xq * xq - 1.0) * fy(yq),
                    max_relative = 1e-8,
                    epsilon = 1e-8
                );
                assert_relative_eq!(
                    interpolator.derivative_xy(xq, yq),
                    (3.0 * xq * xq - 1.0) * (3.0 * yq * yq + 4.0 * yq),
                    max_relative = 1e-8,
                    epsilon = 1e-8
                );
            }
        }
    }

    #[test]
    fn sample_values_are_reproduced_at_grid_nodes() {
        let (x, y, z) = wave_samples(9, 10);
        let interpolator = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();

        for (i, &xq) in x.iter().enumerate() {
            for (j, &yq) in y.iter().enumerate() {
                assert_abs_diff_eq!(interpolator.evaluate(xq, yq), z[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn surface_is_continuous_across_interior_cell_edges() {
        let (x, y, z) = wave_samples(11, 11);
        let interpolator = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();

        let eps = 1e-7;
        for &edge in &[1.0, 2.0, 3.5] {
            for &yq in &[0.6, 2.1, 4.3] {
                assert_abs_diff_eq!(
                    interpolator.evaluate(edge - eps, yq),
                    interpolator.evaluate(edge + eps, yq),
                    epsilon = 1e-5
                );
                assert_abs_diff_eq!(
                    interpolator.derivative_x(edge - eps, yq),
                    interpolator.derivative_x(edge + eps, yq),
                    epsilon = 1e-4
                );
                assert_abs_diff_eq!(
                    interpolator.derivative_y(edge - eps, yq),
                    interpolator.derivative_y(edge + eps, yq),
                    epsilon = 1e-4
                );
                // The same edge crossed along y.
                assert_abs_diff_eq!(
                    interpolator.evaluate(yq, edge - eps),
                    interpolator.evaluate(yq, edge + eps),
                    epsilon = 1e-5
                );
                assert_abs_diff_eq!(
                    interpolator.derivative_y(yq, edge - eps),
                    interpolator.derivative_y(yq, edge + eps),
                    epsilon = 1e-4
                );
            }
        }
    }

    #[test]
    fn extrapolation_extends_the_boundary_cell_polynomial() {
        let (x, y, z) = quadratic_product_samples();
        let interpolator = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();

        // The boundary cell polynomial in x is exactly x² for these samples,
        // so evaluating at local coordinate x̄ = -10 must give the analytic
        // continuation rather than a value clamp.
        assert_relative_eq!(
            interpolator.evaluate(-10.0, 2.5),
            100.0 * 6.25,
            max_relative = 1e-8
        );
        assert_relative_eq!(
            interpolator.evaluate(2.5, 15.0),
            6.25 * 225.0,
            max_relative = 1e-8
        );
    }

    #[test]
    fn transposed_value_matrices_are_accepted() {
        let (x, y, z) = wave_samples(6, 9);
        let from_rows = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();
        let from_transposed =
            BicubicInterpolator::from_coords(&x, &y, &z.t().to_owned()).unwrap();

        for &xq in &[0.3, 1.2, 2.4] {
            for &yq in &[0.1, 1.9, 3.8] {
                assert_abs_diff_eq!(
                    from_rows.evaluate(xq, yq),
                    from_transposed.evaluate(xq, yq),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn flat_layouts_match_the_matrix_constructor() {
        let (x, y, z) = wave_samples(6, 9);
        let reference = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();

        let x_major: Vec<fgr> = z.iter().cloned().collect();
        let y_major: Vec<fgr> = z.t().iter().cloned().collect();

        let from_x_major =
            BicubicInterpolator::from_flat(&x, &y, &x_major, SampleLayout::XMajor).unwrap();
        let from_y_major =
            BicubicInterpolator::from_flat(&x, &y, &y_major, SampleLayout::YMajor).unwrap();

        for &xq in &[0.2, 1.3, 2.45] {
            for &yq in &[0.5, 2.2, 3.9] {
                assert_abs_diff_eq!(
                    reference.evaluate(xq, yq),
                    from_x_major.evaluate(xq, yq),
                    epsilon = 1e-12
                );
                assert_abs_diff_eq!(
                    reference.evaluate(xq, yq),
                    from_y_major.evaluate(xq, yq),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn inconsistent_sample_counts_are_rejected() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let z = vec![0.0; 25];
        assert!(matches!(
            BicubicInterpolator::from_flat(&x, &y, &z, SampleLayout::XMajor),
            Err(ConstructionError::ShapeMismatch { .. })
        ));

        let z = Array2::<fgr>::zeros((5, 7));
        let x5: Vec<fgr> = (0..5).map(|i| i as fgr).collect();
        let y6: Vec<fgr> = (0..6).map(|j| j as fgr).collect();
        assert!(matches!(
            BicubicInterpolator::from_coords(&x5, &y6, &z),
            Err(ConstructionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn too_few_samples_along_an_axis_are_rejected() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let z = Array2::<fgr>::zeros((4, 6));
        assert!(matches!(
            BicubicInterpolator::from_coords(&x, &y, &z),
            Err(ConstructionError::DomainSize {
                required: 5,
                actual: 4,
                ..
            })
        ));
    }

    #[test]
    fn construction_is_invariant_under_axis_reversal() {
        let (x, y, z) = wave_samples(7, 8);
        let reference = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();

        let x_rev: Vec<fgr> = x.iter().rev().cloned().collect();
        let y_rev: Vec<fgr> = y.iter().rev().cloned().collect();
        let mut z_x_rev = z.clone();
        z_x_rev.invert_axis(Axis(0));
        let mut z_y_rev = z.clone();
        z_y_rev.invert_axis(Axis(1));
        let mut z_xy_rev = z_x_rev.clone();
        z_xy_rev.invert_axis(Axis(1));

        let from_x_rev = BicubicInterpolator::from_coords(&x_rev, &y, &z_x_rev).unwrap();
        let from_y_rev = BicubicInterpolator::from_coords(&x, &y_rev, &z_y_rev).unwrap();
        let from_xy_rev = BicubicInterpolator::from_coords(&x_rev, &y_rev, &z_xy_rev).unwrap();

        for &xq in &[0.1, 1.4, 2.8] {
            for &yq in &[0.3, 1.7, 3.2] {
                let expected = reference.evaluate(xq, yq);
                assert_abs_diff_eq!(from_x_rev.evaluate(xq, yq), expected, epsilon = 1e-12);
                assert_abs_diff_eq!(from_y_rev.evaluate(xq, yq), expected, epsilon = 1e-12);
                assert_abs_diff_eq!(from_xy_rev.evaluate(xq, yq), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn reduction_agrees_with_direct_evaluation() {
        let (x, y, z) = wave_samples(9, 10);
        let interpolator = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();

        let reduced_over_y = interpolator.reduce_x(2.3);
        let reduced_over_x = interpolator.reduce_y(1.7);

        for &q in &[0.0, 0.45, 1.8, 3.33, 4.4] {
            assert_abs_diff_eq!(
                reduced_over_y.evaluate(q),
                interpolator.evaluate(2.3, q),
                epsilon = 1e-11
            );
            assert_abs_diff_eq!(
                reduced_over_y.derivative(q),
                interpolator.derivative_y(2.3, q),
                epsilon = 1e-10
            );
            assert_abs_diff_eq!(
                reduced_over_x.evaluate(q),
                interpolator.evaluate(q, 1.7),
                epsilon = 1e-11
            );
            assert_abs_diff_eq!(
                reduced_over_x.derivative(q),
                interpolator.derivative_x(q, 1.7),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn cross_derivative_schemes_agree_for_low_degree_samples() {
        let (x, y, z) = quadratic_product_samples();
        let composed = BicubicInterpolator::from_coords_with_config(
            &x,
            &y,
            &z,
            BicubicInterpolatorConfig {
                cross_derivative_scheme: CrossDerivativeScheme::ComposedFourthOrder,
            },
        )
        .unwrap();
        let low_order = BicubicInterpolator::from_coords_with_config(
            &x,
            &y,
            &z,
            BicubicInterpolatorConfig {
                cross_derivative_scheme: CrossDerivativeScheme::LowOrderCentral,
            },
        )
        .unwrap();

        // At an interior cell both schemes see exact corner derivatives of
        // the degree-2 samples and build the same polynomial.
        assert_abs_diff_eq!(composed.evaluate(2.5, 2.5), 39.0625, epsilon = 1e-8);
        assert_abs_diff_eq!(
            composed.evaluate(2.5, 2.5),
            low_order.evaluate(2.5, 2.5),
            epsilon = 1e-10
        );
    }

    #[test]
    fn failed_reconstruction_leaves_interpolator_usable() {
        let (x, y, z) = quadratic_product_samples();
        let mut interpolator = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();
        let before = interpolator.evaluate(2.5, 2.5);

        let bad_z = Array2::<fgr>::zeros((3, 3));
        assert!(interpolator.reconstruct(&x, &y, &bad_z).is_err());
        assert_abs_diff_eq!(interpolator.evaluate(2.5, 2.5), before);

        let doubled = z.mapv(|value| 2.0 * value);
        interpolator.reconstruct(&x, &y, &doubled).unwrap();
        assert_abs_diff_eq!(
            interpolator.evaluate(2.5, 2.5),
            2.0 * before,
            epsilon = 1e-8
        );
    }

    #[test]
    fn start_and_spacing_constructor_matches_coordinate_constructor() {
        let (x, y, z) = wave_samples(6, 7);
        let from_coords = BicubicInterpolator::from_coords(&x, &y, &z).unwrap();
        let from_spacing =
            BicubicInterpolator::from_start_and_spacing(0.0, 0.5, 0.0, 0.5, &z).unwrap();

        for &xq in &[0.2, 1.1, 2.3] {
            assert_abs_diff_eq!(
                from_coords.evaluate(xq, 1.3),
                from_spacing.evaluate(xq, 1.3),
                epsilon = 1e-14
            );
        }
    }
}
