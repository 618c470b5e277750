//! Error types for interpolator construction.

use std::{error, fmt};

/// Result type for fallible interpolator construction.
pub type ConstructionResult<T> = Result<T, ConstructionError>;

/// Errors that can occur when constructing an interpolator from samples.
///
/// Construction either succeeds with a fully initialized coefficient store
/// or fails with one of these errors; there is no partially usable state.
/// Query-time conditions (coordinates outside the sample domain) are not
/// errors and are handled by clamped extrapolation instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// Sample value array size is inconsistent with the coordinate arrays.
    ShapeMismatch {
        expected: String,
        actual: String,
        context: &'static str,
    },
    /// An axis has too few samples for the finite-difference stencils.
    DomainSize {
        required: usize,
        actual: usize,
        context: &'static str,
    },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Shape mismatch in {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            Self::DomainSize {
                required,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Too few samples in {}: need at least {}, got {}",
                    context, required, actual
                )
            }
        }
    }
}

impl error::Error for ConstructionError {}
