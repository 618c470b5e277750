//! The `gridspline` crate provides fast piecewise-cubic interpolation, with
//! analytic first and second derivatives, of functions sampled on regular
//! 1D and 2D grids.
pub mod error;
pub mod grid;
pub mod interpolation;
pub mod num;
pub mod stencil;
