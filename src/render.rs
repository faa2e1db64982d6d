//! A minimal consumer for escape-time grids: a grayscale image in which
//! brightness follows escape time and the set itself is black.
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::escape::EscapeTimeGrid;

/// Maps each cell to an 8-bit gray level, top image row first.
///
/// The grid's row 0 is its lowest imaginary value, so rows are emitted
/// in reverse to put `y_max` at the top of the picture.  Saturated
/// cells are black; escaped cells scale with `escape / max_iter`.
pub fn grayscale(grid: &EscapeTimeGrid) -> Vec<u8> {
    let max_iter = grid.max_iter();
    grid.rows()
        .rev()
        .flat_map(|row| row.iter())
        .map(|&escape| {
            if escape >= max_iter {
                0
            } else {
                (1 + (escape * 254) / max_iter) as u8
            }
        })
        .collect()
}

/// Writes the grid as a binary PGM graymap.
pub fn write_image<P: AsRef<Path>>(path: P, grid: &EscapeTimeGrid) -> Result<(), io::Error> {
    let pixels = grayscale(grid);
    let output = File::create(path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
    encoder.encode(
        &pixels[..],
        grid.width() as u32,
        grid.height() as u32,
        ColorType::Gray(8),
    )?;
    Ok(())
}

/// Writes the grid as text, one whitespace-separated line per row in
/// grid order.
pub fn write_text<W: Write>(out: &mut W, grid: &EscapeTimeGrid) -> Result<(), io::Error> {
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(|e| e.to_string()).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}
