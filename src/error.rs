//! Input-validation failures.  Everything here is detected before a
//! single sample is allocated, so a caller never sees a partial grid.

use failure::Fail;

/// Which part of a region or resolution was unusable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RegionFault {
    /// The resolution asked for no columns.
    ZeroWidth,
    /// The resolution asked for no rows.
    ZeroHeight,
    /// `x_min` is not strictly less than `x_max` (or one is NaN).
    RealSpan {
        /// The requested lower real bound.
        x_min: f64,
        /// The requested upper real bound.
        x_max: f64,
    },
    /// `y_min` is not strictly less than `y_max` (or one is NaN).
    ImaginarySpan {
        /// The requested lower imaginary bound.
        y_min: f64,
        /// The requested upper imaginary bound.
        y_max: f64,
    },
}

impl std::fmt::Display for RegionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            RegionFault::ZeroWidth => write!(f, "width must be at least 1"),
            RegionFault::ZeroHeight => write!(f, "height must be at least 1"),
            RegionFault::RealSpan { x_min, x_max } => {
                write!(f, "xmin ({}) must be less than xmax ({})", x_min, x_max)
            }
            RegionFault::ImaginarySpan { y_min, y_max } => {
                write!(f, "ymin ({}) must be less than ymax ({})", y_min, y_max)
            }
        }
    }
}

/// The error type for everything the core can refuse to do.
#[derive(Debug, Fail, PartialEq)]
pub enum MandelbrotError {
    /// Malformed bounds or resolution.
    #[fail(display = "invalid region: {}", _0)]
    InvalidRegion(RegionFault),
    /// The iteration cap was not positive.
    #[fail(display = "invalid iteration bound: max_iter must be at least 1, got {}", _0)]
    InvalidIterationBound(usize),
}

impl From<RegionFault> for MandelbrotError {
    fn from(fault: RegionFault) -> Self {
        MandelbrotError::InvalidRegion(fault)
    }
}
