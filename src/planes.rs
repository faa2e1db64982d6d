//! Contains the Grid Builder, which describes a relationship between a
//! rectangle on the integral plane (columns and rows of output cells)
//! and a rectangle on the complex plane, and lays one sample point of
//! the latter over every cell of the former.
//!
//! Grids are row-major.  Row 0 lies on `y_min` and column 0 on
//! `x_min`; the last row and column lie exactly on `y_max` and `x_max`.
use itertools::iproduct;
use num::Complex;

use crate::error::{MandelbrotError, RegionFault};

/// Describes the lower-left corner and upper-right corner of a
/// rectangle on the complex plane, treating the real part as the
/// x-component and the imaginary part as the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    /// Smallest real value sampled.
    pub x_min: f64,
    /// Largest real value sampled.
    pub x_max: f64,
    /// Smallest imaginary value sampled.
    pub y_min: f64,
    /// Largest imaginary value sampled.
    pub y_max: f64,
}

impl Region {
    /// Bounds in the same order the command line takes them.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Region {
        Region {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Builds a region from its left-lower and right-upper corners.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Region {
        Region::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
    }

    /// Checks the bounds are strictly ordered.  NaN bounds fail both
    /// comparisons and are rejected along with reversed or empty spans.
    pub fn validate(&self) -> Result<(), RegionFault> {
        if !(self.x_min < self.x_max) {
            return Err(RegionFault::RealSpan {
                x_min: self.x_min,
                x_max: self.x_max,
            });
        }
        if !(self.y_min < self.y_max) {
            return Err(RegionFault::ImaginarySpan {
                y_min: self.y_min,
                y_max: self.y_max,
            });
        }
        Ok(())
    }
}

/// Describes the width and height of an integral plane that is
/// assumed to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resolution {
    /// Number of sample columns.
    pub width: usize,
    /// Number of sample rows.
    pub height: usize,
}

impl Resolution {
    /// Width, then height.
    pub fn new(width: usize, height: usize) -> Resolution {
        Resolution { width, height }
    }

    /// The total number of cells.  Used to calculate memory needs.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rejects zero-sized resolutions.
    pub fn validate(&self) -> Result<(), RegionFault> {
        if self.width == 0 {
            return Err(RegionFault::ZeroWidth);
        }
        if self.height == 0 {
            return Err(RegionFault::ZeroHeight);
        }
        Ok(())
    }
}

/// Samples `n` evenly spaced values from `min` to `max` inclusive.
///
/// The lower half of the axis is measured up from `min` and the upper
/// half down from `max`, so both ends are hit exactly and an axis
/// symmetric about zero yields exactly negated mirror samples.  A
/// single-sample axis sits on `min`.
fn axis(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![min];
    }
    let span = max - min;
    let last = (n - 1) as f64;
    (0..n)
        .map(|i| {
            if 2 * i < n {
                min + (i as f64) * span / last
            } else {
                max - ((n - 1 - i) as f64) * span / last
            }
        })
        .collect()
}

/// One complex coordinate per output cell, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    region: Region,
    resolution: Resolution,
    points: Vec<Complex<f64>>,
}

impl SampleGrid {
    /// Lays the resolution over the region.  Invalid input is refused
    /// before anything is allocated.
    pub fn new(region: Region, resolution: Resolution) -> Result<SampleGrid, MandelbrotError> {
        resolution.validate()?;
        region.validate()?;

        let xs = axis(region.x_min, region.x_max, resolution.width);
        let ys = axis(region.y_min, region.y_max, resolution.height);
        let points = iproduct!(ys.iter(), xs.iter())
            .map(|(&im, &re)| Complex::new(re, im))
            .collect();

        Ok(SampleGrid {
            region,
            resolution,
            points,
        })
    }

    /// The region this grid samples.
    pub fn region(&self) -> Region {
        self.region
    }

    /// The number of columns and rows.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.resolution.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.resolution.height
    }

    /// All samples, row-major.
    pub fn points(&self) -> &[Complex<f64>] {
        &self.points
    }

    /// The sample under cell (row, column), if it exists.
    pub fn get(&self, row: usize, column: usize) -> Option<Complex<f64>> {
        if row >= self.height() || column >= self.width() {
            return None;
        }
        Some(self.points[row * self.width() + column])
    }
}
