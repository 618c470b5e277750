//! Piecewise-cubic interpolation of gridded samples.

pub mod batch;
pub mod bicubic;
pub mod cubic;

use crate::{
    error::{ConstructionError, ConstructionResult},
    grid::fgr,
    stencil::MIN_SAMPLES_PER_AXIS,
};

/// Floating-point precision of interpolated values.
#[allow(non_camel_case_types)]
pub type fip = f64;

/// Transform from cubic Hermite data (values and index-space derivatives at
/// the two cell corners) to power-basis polynomial coefficients. Applying it
/// along both axes of a cell's corner data matrix yields the bicubic
/// coefficient block; the resulting patchwork is continuous in value and
/// first derivative across every shared cell edge.
pub(crate) const HERMITE_BASIS: [[fgr; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [-3.0, 3.0, -2.0, -1.0],
    [2.0, -2.0, 1.0, 1.0],
];

/// Power-basis vector (1, t, t², t³) at the given local coordinate.
pub(crate) fn power_vector(t: fgr) -> [fgr; 4] {
    [1.0, t, t * t, t * t * t]
}

/// First derivative of the power-basis vector.
pub(crate) fn power_vector_derivative(t: fgr) -> [fgr; 4] {
    [0.0, 1.0, 2.0 * t, 3.0 * t * t]
}

/// Second derivative of the power-basis vector.
pub(crate) fn power_vector_second_derivative(t: fgr) -> [fgr; 4] {
    [0.0, 0.0, 2.0, 6.0 * t]
}

/// Checks that an axis has enough samples for the derivative stencils.
pub(crate) fn check_axis_size(n_samples: usize, context: &'static str) -> ConstructionResult<()> {
    if n_samples < MIN_SAMPLES_PER_AXIS {
        Err(ConstructionError::DomainSize {
            required: MIN_SAMPLES_PER_AXIS,
            actual: n_samples,
            context,
        })
    } else {
        Ok(())
    }
}

/// Defines the query operations of a 1D interpolator over a regular grid.
///
/// Evaluation is a pure read of the coefficient store built at construction
/// and never fails; coordinates outside the sample domain extrapolate with
/// the boundary cell's polynomial.
pub trait Interpolator1: Sync + Send {
    /// Computes the interpolated value at the given coordinate.
    fn evaluate(&self, x: fgr) -> fip;

    /// Computes the interpolated first derivative at the given coordinate.
    fn derivative(&self, x: fgr) -> fip;

    /// Computes the interpolated second derivative at the given coordinate.
    fn second_derivative(&self, x: fgr) -> fip;
}

/// Defines the query operations of a 2D interpolator over a regular grid.
///
/// The same extrapolation and infallibility properties as [`Interpolator1`]
/// apply, independently along each axis.
pub trait Interpolator2: Sync + Send {
    /// Computes the interpolated value at the given coordinates.
    fn evaluate(&self, x: fgr, y: fgr) -> fip;

    /// Computes the interpolated first derivative in x.
    fn derivative_x(&self, x: fgr, y: fgr) -> fip;

    /// Computes the interpolated first derivative in y.
    fn derivative_y(&self, x: fgr, y: fgr) -> fip;

    /// Computes the interpolated mixed second derivative.
    fn derivative_xy(&self, x: fgr, y: fgr) -> fip;

    /// Computes the interpolated second derivative in x.
    fn derivative_xx(&self, x: fgr, y: fgr) -> fip;

    /// Computes the interpolated second derivative in y.
    fn derivative_yy(&self, x: fgr, y: fgr) -> fip;
}
