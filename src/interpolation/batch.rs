//! Parallel batch evaluation over arrays of query coordinates.
//!
//! Each output element is computed independently from the immutable
//! coefficient store, so the drivers fan the work out over worker threads
//! with no synchronization beyond the final join. Passing `Some(n)` as the
//! parallelism degree installs a dedicated thread pool with `n` threads for
//! the duration of the call; `None` uses the global rayon pool.

use super::{fip, Interpolator2};
use crate::grid::fgr;
use rayon::prelude::*;

/// Evaluates the interpolated value over the outer-product grid of the
/// given x- and y-coordinates, writing the result for `(x[i], y[j])` into
/// `out[i*y.len() + j]`.
pub fn evaluate_grid_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_grid_into(interpolator, I::evaluate, x, y, out, num_threads);
}

/// Evaluates the interpolated first derivative in x over the outer-product
/// grid of the given coordinates.
pub fn derivative_x_grid_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_grid_into(interpolator, I::derivative_x, x, y, out, num_threads);
}

/// Evaluates the interpolated first derivative in y over the outer-product
/// grid of the given coordinates.
pub fn derivative_y_grid_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_grid_into(interpolator, I::derivative_y, x, y, out, num_threads);
}

/// Evaluates the interpolated mixed derivative over the outer-product grid
/// of the given coordinates.
pub fn derivative_xy_grid_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_grid_into(interpolator, I::derivative_xy, x, y, out, num_threads);
}

/// Evaluates the interpolated second derivative in x over the outer-product
/// grid of the given coordinates.
pub fn derivative_xx_grid_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_grid_into(interpolator, I::derivative_xx, x, y, out, num_threads);
}

/// Evaluates the interpolated second derivative in y over the outer-product
/// grid of the given coordinates.
pub fn derivative_yy_grid_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_grid_into(interpolator, I::derivative_yy, x, y, out, num_threads);
}

/// Evaluates the interpolated value at every paired point
/// `(x[k], y[k])`, writing the result into `out[k]`.
pub fn evaluate_points_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_points_into(interpolator, I::evaluate, x, y, out, num_threads);
}

/// Evaluates the interpolated first derivative in x at every paired point.
pub fn derivative_x_points_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_points_into(interpolator, I::derivative_x, x, y, out, num_threads);
}

/// Evaluates the interpolated first derivative in y at every paired point.
pub fn derivative_y_points_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_points_into(interpolator, I::derivative_y, x, y, out, num_threads);
}

/// Evaluates the interpolated mixed derivative at every paired point.
pub fn derivative_xy_points_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_points_into(interpolator, I::derivative_xy, x, y, out, num_threads);
}

/// Evaluates the interpolated second derivative in x at every paired point.
pub fn derivative_xx_points_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_points_into(interpolator, I::derivative_xx, x, y, out, num_threads);
}

/// Evaluates the interpolated second derivative in y at every paired point.
pub fn derivative_yy_points_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    map_points_into(interpolator, I::derivative_yy, x, y, out, num_threads);
}

fn map_grid_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    kernel: fn(&I, fgr, fgr) -> fip,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    assert_eq!(
        out.len(),
        x.len() * y.len(),
        "Output buffer size does not match the query grid."
    );
    if y.is_empty() {
        return;
    }
    run_with_threads(num_threads, || {
        out.par_chunks_mut(y.len())
            .zip(x.par_iter())
            .for_each(|(row, &xq)| {
                for (slot, &yq) in row.iter_mut().zip(y) {
                    *slot = kernel(interpolator, xq, yq);
                }
            });
    });
}

fn map_points_into<I: Interpolator2 + ?Sized>(
    interpolator: &I,
    kernel: fn(&I, fgr, fgr) -> fip,
    x: &[fgr],
    y: &[fgr],
    out: &mut [fip],
    num_threads: Option<usize>,
) {
    assert_eq!(
        x.len(),
        y.len(),
        "Paired coordinate lists must have equal lengths."
    );
    assert_eq!(
        out.len(),
        x.len(),
        "Output buffer size does not match the query point list."
    );
    run_with_threads(num_threads, || {
        out.par_iter_mut()
            .zip(x.par_iter().zip(y.par_iter()))
            .for_each(|(slot, (&xq, &yq))| {
                *slot = kernel(interpolator, xq, yq);
            });
    });
}

fn run_with_threads(num_threads: Option<usize>, op: impl FnOnce() + Send) {
    match num_threads {
        Some(n_threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
            .expect("Could not create thread pool for batch evaluation.")
            .install(op),
        None => op(),
    }
}
