extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate log;
extern crate mandelbrot;
extern crate num_cpus;

use clap::{value_t, App, Arg, ArgMatches};
use failure::Error;
use log::info;
use mandelbrot::render::{write_image, write_text};
use mandelbrot::{mandelbrot_set_threaded, Region, Resolution};
use std::io::{self, Write};
use std::time::Instant;

const XMIN: &str = "xmin";
const XMAX: &str = "xmax";
const YMIN: &str = "ymin";
const YMAX: &str = "ymax";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const MAX_ITER: &str = "max_iter";
const THREADS: &str = "threads";
const OUTPUT: &str = "output";

fn bound(name: &'static str, default: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .allow_hyphen_values(true)
        .default_value(default)
        .help(help)
}

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .about("Escape-time Mandelbrot set generator")
        .arg(bound(XMIN, "-2.0", "Smallest real value sampled"))
        .arg(bound(XMAX, "0.5", "Largest real value sampled"))
        .arg(bound(YMIN, "-1.25", "Smallest imaginary value sampled"))
        .arg(bound(YMAX, "1.25", "Largest imaginary value sampled"))
        .arg(
            Arg::with_name(WIDTH)
                .long(WIDTH)
                .takes_value(true)
                .default_value("800")
                .help("Number of sample columns"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .long(HEIGHT)
                .takes_value(true)
                .default_value("800")
                .help("Number of sample rows"),
        )
        .arg(
            Arg::with_name(MAX_ITER)
                .long(MAX_ITER)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .help("Iteration cap; cells that survive it are in the set"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .help("Number of threads to use in solver (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Write a PGM image here instead of printing the grid"),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let region = Region::new(
        value_t!(matches, XMIN, f64)?,
        value_t!(matches, XMAX, f64)?,
        value_t!(matches, YMIN, f64)?,
        value_t!(matches, YMAX, f64)?,
    );
    let resolution = Resolution::new(
        value_t!(matches, WIDTH, usize)?,
        value_t!(matches, HEIGHT, usize)?,
    );
    let max_iter = value_t!(matches, MAX_ITER, usize)?;
    let threads = if matches.is_present(THREADS) {
        value_t!(matches, THREADS, usize)?
    } else {
        num_cpus::get()
    };

    let started = Instant::now();
    let grid = mandelbrot_set_threaded(region, resolution, max_iter, threads)?;
    info!(
        "computed {}x{} grid with {} threads in {:?}",
        resolution.width,
        resolution.height,
        threads,
        started.elapsed()
    );

    match matches.value_of(OUTPUT) {
        Some(path) => {
            write_image(path, &grid)?;
            info!("wrote {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut out = io::BufWriter::new(stdout.lock());
            write_text(&mut out, &grid)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("mandel: {}", e);
        std::process::exit(1);
    }
}
