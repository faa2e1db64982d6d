extern crate mandelbrot;
extern crate rand;

use mandelbrot::{
    escape_times, escape_times_single, mandelbrot_set, mandelbrot_set_threaded,
    MandelbrotError, Region, RegionFault, Resolution, SampleGrid,
};
use rand::Rng;

fn random_region<R: Rng>(rng: &mut R) -> Region {
    let x_min = rng.gen_range(-2.5, 0.5);
    let y_min = rng.gen_range(-1.5, 1.0);
    Region::new(
        x_min,
        x_min + rng.gen_range(0.001, 1.5),
        y_min,
        y_min + rng.gen_range(0.001, 1.5),
    )
}

#[test]
fn end_to_end_classic_view() {
    let grid = mandelbrot_set(-2.0, 0.5, -1.25, 1.25, 10, 10, 50).unwrap();
    assert_eq!(grid.width(), 10);
    assert_eq!(grid.height(), 10);
    assert_eq!(grid.rows().count(), 10);
    assert!(grid.rows().all(|row| row.len() == 10));
    assert!(grid.as_slice().iter().all(|&e| e <= 50));
    for &(row, column) in &[(0, 0), (0, 9), (9, 0), (9, 9)] {
        assert!(grid.get(row, column).unwrap() < 10);
    }
    // Somewhere in the middle of the picture is the set itself.
    assert!(grid.as_slice().iter().any(|&e| e == 50));
}

#[test]
fn values_stay_within_bounds() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let region = random_region(&mut rng);
        let max_iter = rng.gen_range(1, 200);
        let grid = mandelbrot_set_threaded(region, Resolution::new(17, 13), max_iter, 3).unwrap();
        assert_eq!(grid.as_slice().len(), 17 * 13);
        assert!(grid.as_slice().iter().all(|&e| e <= max_iter));
    }
}

#[test]
fn repeated_runs_are_identical() {
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let region = random_region(&mut rng);
        let sample = SampleGrid::new(region, Resolution::new(31, 29)).unwrap();
        let first = escape_times_single(&sample, 300).unwrap();
        assert_eq!(escape_times_single(&sample, 300).unwrap(), first);
        assert_eq!(escape_times(&sample, 300, 4).unwrap(), first);
        assert_eq!(escape_times(&sample, 300, 4).unwrap(), first);
    }
}

#[test]
fn raising_the_cap_only_refines_saturated_cells() {
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let region = random_region(&mut rng);
        let sample = SampleGrid::new(region, Resolution::new(24, 24)).unwrap();
        let low = escape_times_single(&sample, 40).unwrap();
        let high = escape_times_single(&sample, 400).unwrap();
        for (&before, &after) in low.as_slice().iter().zip(high.as_slice()) {
            if before < 40 {
                assert_eq!(before, after);
            } else {
                assert!(after >= 40);
            }
        }
    }
}

#[test]
fn conjugate_rows_agree() {
    let mut rng = rand::thread_rng();
    let mut regions = vec![Region::new(-2.0, 0.5, -1.25, 1.25)];
    for _ in 0..5 {
        let y = rng.gen_range(0.01, 1.5);
        regions.push(Region::new(
            rng.gen_range(-2.5, -0.5),
            rng.gen_range(-0.4, 0.6),
            -y,
            y,
        ));
    }
    for region in regions {
        for &height in &[10, 11] {
            let grid = mandelbrot_set_threaded(region, Resolution::new(40, height), 500, 2).unwrap();
            for row in 0..height {
                assert_eq!(grid.row(row), grid.row(height - 1 - row));
            }
        }
    }
}

#[test]
fn early_exit_leaves_far_away_regions_at_zero() {
    let grid = mandelbrot_set_threaded(
        Region::new(2.5, 3.5, 2.5, 3.5),
        Resolution::new(50, 50),
        10_000_000,
        2,
    )
    .unwrap();
    assert!(grid.as_slice().iter().all(|&e| e == 0));
}

#[test]
fn degenerate_inputs_are_rejected() {
    assert_eq!(
        mandelbrot_set(-2.0, 0.5, -1.25, 1.25, 0, 10, 50),
        Err(MandelbrotError::InvalidRegion(RegionFault::ZeroWidth))
    );
    assert_eq!(
        mandelbrot_set(-2.0, 0.5, -1.25, 1.25, 10, 0, 50),
        Err(MandelbrotError::InvalidRegion(RegionFault::ZeroHeight))
    );
    assert_eq!(
        mandelbrot_set(0.5, 0.5, -1.25, 1.25, 10, 10, 50),
        Err(MandelbrotError::InvalidRegion(RegionFault::RealSpan {
            x_min: 0.5,
            x_max: 0.5
        }))
    );
    assert_eq!(
        mandelbrot_set(-2.0, 0.5, 1.25, -1.25, 10, 10, 50),
        Err(MandelbrotError::InvalidRegion(RegionFault::ImaginarySpan {
            y_min: 1.25,
            y_max: -1.25
        }))
    );
    assert_eq!(
        mandelbrot_set(-2.0, 0.5, -1.25, 1.25, 10, 10, 0),
        Err(MandelbrotError::InvalidIterationBound(0))
    );
}

#[test]
fn single_cell_grid_samples_the_lower_corner() {
    let grid = mandelbrot_set(0.0, 3.0, 0.0, 3.0, 1, 1, 25).unwrap();
    assert_eq!(grid.as_slice(), &[25]);
    let grid = mandelbrot_set(3.0, 4.0, 0.0, 3.0, 1, 1, 25).unwrap();
    assert_eq!(grid.as_slice(), &[0]);
}
