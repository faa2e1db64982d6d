#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot escape-time generator
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring and adding `c`, starting from zero,
//! never runs off to infinity.  Once the orbit leaves the circle of
//! radius two it is guaranteed to diverge, so the number of iterations
//! it takes to get there (its "escape time") is a measure of how far
//! outside the set `c` lies.
//!
//! This crate does two things, strictly in order: it lays a grid of
//! sample points over a rectangle of the complex plane
//! ([`planes`]), and it computes an escape time for every one of them
//! ([`escape`]).  The product is an [`EscapeTimeGrid`] of integers in
//! `[0, max_iter]`, row-major with row 0 on `y_min`; turning that into a
//! picture is someone else's job, although [`render`] has a plain
//! grayscale writer for convenience.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod error;
pub mod escape;
pub mod planes;
pub mod render;

pub use error::{MandelbrotError, RegionFault};
pub use escape::{
    escape_times, escape_times_single, CellState, EscapeTimeGrid, Evaluator, Orbit,
};
pub use planes::{Region, Resolution, SampleGrid};

/// Computes the escape-time grid for a region and resolution, using
/// every available CPU.  The arguments are the options the command
/// line recognizes, in the same order.
pub fn mandelbrot_set(
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    width: usize,
    height: usize,
    max_iter: usize,
) -> Result<EscapeTimeGrid, MandelbrotError> {
    mandelbrot_set_threaded(
        Region::new(xmin, xmax, ymin, ymax),
        Resolution::new(width, height),
        max_iter,
        num_cpus::get(),
    )
}

/// As [`mandelbrot_set`], with an explicit worker count.  Every input
/// is validated before anything is allocated.
pub fn mandelbrot_set_threaded(
    region: Region,
    resolution: Resolution,
    max_iter: usize,
    threads: usize,
) -> Result<EscapeTimeGrid, MandelbrotError> {
    if max_iter == 0 {
        return Err(MandelbrotError::InvalidIterationBound(max_iter));
    }
    let grid = SampleGrid::new(region, resolution)?;
    escape_times(&grid, max_iter, threads)
}
