//! Utilities related to numbers.

use crate::grid::fgr;
use std::fmt;

/// Floating point marker trait for the sample value types accepted by the
/// interpolator constructors.
pub trait SplineFloat:
    Sync + Send + num::Float + num::cast::AsPrimitive<fgr> + fmt::Debug
{
}

impl SplineFloat for f32 {}
impl SplineFloat for f64 {}
