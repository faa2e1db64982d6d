// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time evaluation
//!
//! Every sample `c` of a grid is iterated under `z = z * z + c`
//! starting from zero.  The iteration index at which `|z|` first
//! exceeds the escape radius is that cell's escape time; a cell that
//! never gets there within `max_iter` iterations is saturated and
//! reports `max_iter`.
//!
//! Cells advance in lock-step: each step moves every still-active cell
//! forward by one iteration.  Active cells are tracked by index, so a
//! cell that has escaped is never touched again and the "is anything
//! left?" check is just an emptiness test.  The threaded evaluator
//! hands rows out to workers in bands, each of which runs the same
//! lock-step over its own cells; since no cell depends on any other,
//! the result is the same whatever the band layout or thread count.

use crossbeam::thread::ScopedJoinHandle;
use log::{debug, trace};
use num::Complex;
use std::panic;
use std::sync::Mutex;

use crate::error::MandelbrotError;
use crate::planes::{Resolution, SampleGrid};

/// Any orbit that leaves the circle of this radius diverges.
pub const ESCAPE_RADIUS: f64 = 2.0;
const ESCAPE_RADIUS_SQR: f64 = ESCAPE_RADIUS * ESCAPE_RADIUS;

/// Is `|z|` past the escape radius?  The squared magnitude filters
/// cheaply; the square root is only taken to settle candidates, which
/// keeps the answer identical to comparing `sqrt(re² + im²)` directly.
/// NaN counts as escaped so that a poisoned orbit cannot run forever.
#[inline]
pub fn has_escaped(z: Complex<f64>) -> bool {
    let norm_sqr = z.norm_sqr();
    norm_sqr.is_nan() || (norm_sqr > ESCAPE_RADIUS_SQR && norm_sqr.sqrt() > ESCAPE_RADIUS)
}

/// Where a single cell is in its lifecycle.  `Escaped` and `Saturated`
/// are terminal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CellState {
    /// Still being iterated.
    Active,
    /// Crossed the escape radius on the update step with this index.
    Escaped(usize),
    /// Survived every iteration allowed.
    Saturated,
}

/// The transient per-cell state of the evaluator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orbit {
    z: Complex<f64>,
    state: CellState,
}

impl Default for Orbit {
    fn default() -> Self {
        Orbit::new()
    }
}

impl Orbit {
    /// A fresh orbit at the origin.
    pub fn new() -> Orbit {
        Orbit {
            z: Complex::new(0.0, 0.0),
            state: CellState::Active,
        }
    }

    /// The current value of `z`.
    pub fn z(&self) -> Complex<f64> {
        self.z
    }

    /// The current lifecycle state.
    pub fn state(&self) -> CellState {
        self.state
    }

    /// True until the orbit escapes or is saturated.
    pub fn is_active(&self) -> bool {
        self.state == CellState::Active
    }

    /// Applies update step `iteration` for sample `c`, recording the
    /// escape if this step carried `z` past the radius.  Returns whether
    /// the orbit is still active afterwards.  An inactive orbit is left
    /// exactly as it is.
    pub fn advance(&mut self, c: Complex<f64>, iteration: usize) -> bool {
        if !self.is_active() {
            return false;
        }
        self.z = self.z * self.z + c;
        if has_escaped(self.z) {
            self.state = CellState::Escaped(iteration);
            return false;
        }
        true
    }

    /// Marks an orbit that outlived the iteration cap.
    fn saturate(&mut self) {
        if self.is_active() {
            self.state = CellState::Saturated;
        }
    }

    /// The value this cell contributes to the output grid.
    pub fn escape_time(&self, max_iter: usize) -> usize {
        match self.state {
            CellState::Escaped(i) => i,
            CellState::Active | CellState::Saturated => max_iter,
        }
    }
}

/// Moves every listed cell forward by one iteration and drops the ones
/// that escaped from the list.
fn step_active(
    points: &[Complex<f64>],
    orbits: &mut [Orbit],
    active: &mut Vec<usize>,
    iteration: usize,
) {
    active.retain(|&k| orbits[k].advance(points[k], iteration));
}

/// Runs a block of cells to completion in lock-step, stopping early once
/// nothing is left active.  Returns the number of steps taken.
fn run_lockstep(points: &[Complex<f64>], orbits: &mut [Orbit], max_iter: usize) -> usize {
    let mut active: Vec<usize> = (0..orbits.len()).collect();
    let mut iteration = 0;
    while iteration < max_iter && !active.is_empty() {
        step_active(points, orbits, &mut active, iteration);
        iteration += 1;
    }
    for k in active {
        orbits[k].saturate();
    }
    iteration
}

fn check_bound(max_iter: usize) -> Result<(), MandelbrotError> {
    if max_iter == 0 {
        return Err(MandelbrotError::InvalidIterationBound(max_iter));
    }
    Ok(())
}

/// The final product: one escape time per cell, in `[0, max_iter]`,
/// laid out exactly like the sample grid it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct EscapeTimeGrid {
    resolution: Resolution,
    max_iter: usize,
    cells: Vec<usize>,
}

impl EscapeTimeGrid {
    fn from_orbits(resolution: Resolution, max_iter: usize, orbits: &[Orbit]) -> EscapeTimeGrid {
        EscapeTimeGrid {
            resolution,
            max_iter,
            cells: orbits.iter().map(|o| o.escape_time(max_iter)).collect(),
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.resolution.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.resolution.height
    }

    /// The iteration cap the grid was computed with.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// The escape time of cell (row, column), if it exists.
    pub fn get(&self, row: usize, column: usize) -> Option<usize> {
        if row >= self.height() || column >= self.width() {
            return None;
        }
        Some(self.cells[row * self.width() + column])
    }

    /// One row, lowest imaginary value first.
    pub fn row(&self, row: usize) -> Option<&[usize]> {
        if row >= self.height() {
            return None;
        }
        let start = row * self.width();
        Some(&self.cells[start..start + self.width()])
    }

    /// All rows in order.
    pub fn rows(&self) -> std::slice::Chunks<usize> {
        self.cells.chunks(self.width())
    }

    /// All cells, row-major.
    pub fn as_slice(&self) -> &[usize] {
        &self.cells
    }

    /// Gives up the grid as a row-major buffer.
    pub fn into_vec(self) -> Vec<usize> {
        self.cells
    }
}

/// A step-at-a-time evaluator over a whole grid.  Each call to `step`
/// advances all active cells by one iteration, which gives callers a
/// place to check for cancellation; dropping the evaluator abandons
/// the computation.
#[derive(Debug)]
pub struct Evaluator<'a> {
    grid: &'a SampleGrid,
    max_iter: usize,
    orbits: Vec<Orbit>,
    active: Vec<usize>,
    iteration: usize,
}

impl<'a> Evaluator<'a> {
    /// Prepares every cell at `z = 0`.  Fails on a zero iteration cap.
    pub fn new(grid: &'a SampleGrid, max_iter: usize) -> Result<Evaluator<'a>, MandelbrotError> {
        check_bound(max_iter)?;
        let cells = grid.points().len();
        Ok(Evaluator {
            grid,
            max_iter,
            orbits: vec![Orbit::new(); cells],
            active: (0..cells).collect(),
            iteration: 0,
        })
    }

    /// The number of update steps applied so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// How many cells have neither escaped nor saturated.
    pub fn active_cells(&self) -> usize {
        self.active.len()
    }

    /// True once the cap is reached or every cell has escaped.
    pub fn is_finished(&self) -> bool {
        self.iteration >= self.max_iter || self.active.is_empty()
    }

    /// Applies one lock-step iteration.  Returns whether any work remains.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        step_active(
            self.grid.points(),
            &mut self.orbits,
            &mut self.active,
            self.iteration,
        );
        self.iteration += 1;
        if self.active.is_empty() && self.iteration < self.max_iter {
            debug!(
                "every cell escaped after {} of {} iterations",
                self.iteration, self.max_iter
            );
        }
        !self.is_finished()
    }

    /// Runs the remaining steps and hands back the grid.
    pub fn finish(mut self) -> EscapeTimeGrid {
        while self.step() {}
        for &k in &self.active {
            self.orbits[k].saturate();
        }
        EscapeTimeGrid::from_orbits(self.grid.resolution(), self.max_iter, &self.orbits)
    }
}

/// Single-threaded evaluation: the whole grid advances in one lock-step.
pub fn escape_times_single(
    grid: &SampleGrid,
    max_iter: usize,
) -> Result<EscapeTimeGrid, MandelbrotError> {
    debug!(
        "evaluating {}x{} grid, max_iter {}, single thread",
        grid.width(),
        grid.height(),
        max_iter
    );
    Ok(Evaluator::new(grid, max_iter)?.finish())
}

/// Multi-threaded evaluation.  Rows are queued as bands and `threads`
/// scoped workers take bands off the queue until it is empty.  A
/// thread count of zero is treated as one.
pub fn escape_times(
    grid: &SampleGrid,
    max_iter: usize,
    threads: usize,
) -> Result<EscapeTimeGrid, MandelbrotError> {
    check_bound(max_iter)?;
    let threads = threads.max(1);
    debug!(
        "evaluating {}x{} grid, max_iter {}, {} threads",
        grid.width(),
        grid.height(),
        max_iter,
        threads
    );

    let width = grid.width();
    let mut orbits = vec![Orbit::new(); grid.points().len()];
    {
        let bands = Mutex::new(
            grid.points()
                .chunks(width)
                .zip(orbits.chunks_mut(width))
                .enumerate(),
        );
        let bands = &bands;
        let outcome = crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<usize>> = (0..threads)
                .map(|_| {
                    spawner.spawn(move |_| {
                        let mut done = 0;
                        loop {
                            // A poisoned queue means another worker died;
                            // the scope reports that panic below.
                            let band = match bands.lock() {
                                Ok(mut bands) => bands.next(),
                                Err(_) => None,
                            };
                            match band {
                                Some((row, (points, orbits))) => {
                                    let steps = run_lockstep(points, orbits, max_iter);
                                    trace!("row {} finished after {} steps", row, steps);
                                    done += 1;
                                }
                                None => break,
                            }
                        }
                        done
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });
        match outcome {
            Ok(joined) => {
                for (worker, result) in joined.into_iter().enumerate() {
                    match result {
                        Ok(done) => trace!("worker {} took {} rows", worker, done),
                        Err(e) => panic::resume_unwind(e),
                    }
                }
            }
            Err(e) => panic::resume_unwind(e),
        }
    }

    Ok(EscapeTimeGrid::from_orbits(grid.resolution(), max_iter, &orbits))
}
