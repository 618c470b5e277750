//! Finite-difference stencils for estimating derivatives at grid nodes.
//!
//! All derivatives are computed in index space, i.e. per grid cell rather
//! than per coordinate unit. Rescaling by the physical cell extent happens
//! at evaluation time through the chain rule.

use crate::grid::fgr;
use ndarray::prelude::*;
use ndarray::Zip;

/// Minimum number of samples an axis must have for the 5-point stencils
/// to be evaluated at every node.
pub const MIN_SAMPLES_PER_AXIS: usize = 5;

/// 4th-order central difference weights over 5 consecutive samples
/// centered on the differentiated node.
pub const CENTRAL_FOURTH_ORDER: [fgr; 5] = [1.0 / 12.0, -8.0 / 12.0, 0.0, 8.0 / 12.0, -1.0 / 12.0];

/// 4th-order one-sided difference weights over the 5 samples anchored at
/// the low boundary, differentiating at the boundary node itself. The
/// mirrored, negated form applies at the high boundary.
pub const ONE_SIDED_FOURTH_ORDER: [fgr; 5] = [-25.0 / 12.0, 4.0, -3.0, 4.0 / 3.0, -1.0 / 4.0];

/// 4th-order difference weights over the same boundary-anchored window,
/// differentiating at the second sample of the window. Anchoring this node
/// at the boundary rather than at the node itself keeps the window inside
/// the domain on a minimal 5-sample axis.
pub const SKEWED_FOURTH_ORDER: [fgr; 5] = [-1.0 / 4.0, -5.0 / 6.0, 3.0 / 2.0, -1.0 / 2.0, 1.0 / 12.0];

/// Scheme used to estimate the mixed (xy) second derivative at grid nodes.
///
/// The two formulations are numerically distinct; whichever is selected is
/// applied uniformly over the whole grid, since mixing them would make the
/// coefficient field discontinuous across cell boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossDerivativeScheme {
    /// Compose two 4th-order first-derivative passes, one along each axis.
    ComposedFourthOrder,
    /// Compose two low-order passes using a 2-point central difference at
    /// interior nodes and a 1-point one-sided difference at the boundaries.
    LowOrderCentral,
}

/// Computes the 4th-order index-space first derivative of a lane of at
/// least 5 samples, writing one estimate per node into `out`.
///
/// Interior nodes use the central stencil; the two nodes nearest each
/// boundary use the one-sided stencil anchored into the domain.
pub fn first_derivative_into(values: ArrayView1<fgr>, mut out: ArrayViewMut1<fgr>) {
    let n = values.len();
    assert!(
        n >= MIN_SAMPLES_PER_AXIS,
        "Cannot evaluate 5-point stencil on a lane of {} samples.",
        n
    );
    assert_eq!(out.len(), n);

    let mut low_edge = 0.0;
    let mut low_next = 0.0;
    let mut high_next = 0.0;
    let mut high_edge = 0.0;
    for k in 0..5 {
        low_edge += values[k] * ONE_SIDED_FOURTH_ORDER[k];
        low_next += values[k] * SKEWED_FOURTH_ORDER[k];
        high_next -= values[n - 1 - k] * SKEWED_FOURTH_ORDER[k];
        high_edge -= values[n - 1 - k] * ONE_SIDED_FOURTH_ORDER[k];
    }
    out[0] = low_edge;
    out[1] = low_next;
    for i in 2..(n - 2) {
        let mut sum = 0.0;
        for (k, &weight) in CENTRAL_FOURTH_ORDER.iter().enumerate() {
            sum += values[i - 2 + k] * weight;
        }
        out[i] = sum;
    }
    out[n - 2] = high_next;
    out[n - 1] = high_edge;
}

/// Computes the low-order index-space first derivative of a lane of at
/// least 2 samples, using a 2-point central difference at interior nodes
/// and a 1-point one-sided difference at the boundary nodes.
pub fn low_order_derivative_into(values: ArrayView1<fgr>, mut out: ArrayViewMut1<fgr>) {
    let n = values.len();
    assert!(
        n >= 2,
        "Cannot evaluate difference stencil on a lane of {} samples.",
        n
    );
    assert_eq!(out.len(), n);

    out[0] = values[1] - values[0];
    for i in 1..(n - 1) {
        out[i] = 0.5 * (values[i + 1] - values[i - 1]);
    }
    out[n - 1] = values[n - 1] - values[n - 2];
}

/// Computes the 4th-order index-space first derivative of every lane of the
/// given 2D array along the given axis, in parallel over lanes.
pub fn first_derivative_grid(values: ArrayView2<fgr>, axis: Axis) -> Array2<fgr> {
    apply_along_axis(values, axis, first_derivative_into)
}

/// Computes the low-order index-space first derivative of every lane of the
/// given 2D array along the given axis, in parallel over lanes.
pub fn low_order_derivative_grid(values: ArrayView2<fgr>, axis: Axis) -> Array2<fgr> {
    apply_along_axis(values, axis, low_order_derivative_into)
}

fn apply_along_axis(
    values: ArrayView2<fgr>,
    axis: Axis,
    op: fn(ArrayView1<fgr>, ArrayViewMut1<fgr>),
) -> Array2<fgr> {
    let mut derivatives = Array2::zeros(values.raw_dim());
    Zip::from(derivatives.lanes_mut(axis))
        .and(values.lanes(axis))
        .par_for_each(|out_lane, lane| op(lane, out_lane));
    derivatives
}
