// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use log::debug;
use mandelbrot::output::write_png;
use mandelbrot::stats::Summary;
use mandelbrot::{ComplexPlane, Palette, RenderConfig, Renderer, Strategy};
use num::Complex;
use std::str::FromStr;
use std::time::Instant;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn parse_palette(s: &str) -> Option<Palette> {
    let weights: Vec<f64> = s
        .split(',')
        .map(f64::from_str)
        .collect::<Result<_, _>>()
        .ok()?;
    match weights.as_slice() {
        [r, g, b] => Some(Palette::new(*r, *g, *b)).filter(Palette::is_valid),
        _ => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const WIDTH: &str = "width";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const STRATEGY: &str = "strategy";
const CAPACITY: &str = "capacity";
const PALETTE: &str = "palette";
const REPEAT: &str = "repeat";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .about("Parallel Mandelbrot escape-time renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file [default: mandelbrot-<strategy>.png]"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .long(WIDTH)
                .short("w")
                .takes_value(true)
                .default_value("750")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_535,
                        "Could not parse image width",
                        "Image width must be between 1 and 65535",
                    )
                })
                .help("Width of output image; the height follows the plane"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2,-1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0.5,1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1024,
                        "Could not parse thread count",
                        "Thread count must be between 1 and 1024",
                    )
                })
                .help("Number of workers [default: number of cpus]"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Escape iteration cap"),
        )
        .arg(
            Arg::with_name(STRATEGY)
                .long(STRATEGY)
                .short("s")
                .takes_value(true)
                .possible_values(&["grid", "pool"])
                .default_value("grid")
                .help("How work is spread over threads"),
        )
        .arg(
            Arg::with_name(CAPACITY)
                .long(CAPACITY)
                .short("c")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse queue capacity",
                        "Queue capacity must be between 1 and 1000000",
                    )
                })
                .help("Task queue bound for the pool strategy"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("230,235,255")
                .validator(|s| match parse_palette(&s) {
                    Some(_) => Ok(()),
                    None => Err("Palette must be three non-negative weights, r,g,b".to_string()),
                })
                .help("Channel weights applied to the escape score"),
        )
        .arg(
            Arg::with_name(REPEAT)
                .long(REPEAT)
                .short("n")
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        10_000,
                        "Could not parse repetition count",
                        "Repetition count must be between 1 and 10000",
                    )
                })
                .help("Render this many times and report timings"),
        )
        .get_matches()
}

// Values below were checked by the validators above; the fallbacks
// only exist to keep the binary free of panics.
fn config(matches: &ArgMatches) -> Option<RenderConfig> {
    let defaults = RenderConfig::default();
    let leftlower = parse_complex(matches.value_of(LEFTLOWER)?)?;
    let rightupper = parse_complex(matches.value_of(RIGHTUPPER)?)?;
    let parallelism = match matches.value_of(THREADS) {
        Some(t) => usize::from_str(t).ok()?,
        None => defaults.parallelism,
    };
    Some(RenderConfig {
        max_iterations: usize::from_str(matches.value_of(ITERATIONS)?).ok()?,
        plane: ComplexPlane(leftlower, rightupper),
        pixel_width: usize::from_str(matches.value_of(WIDTH)?).ok()?,
        palette: parse_palette(matches.value_of(PALETTE)?)?,
        parallelism,
        queue_capacity: usize::from_str(matches.value_of(CAPACITY)?).ok()?,
        strategy: Strategy::from_str(matches.value_of(STRATEGY)?).ok()?,
    })
}

fn fail(message: &dyn std::fmt::Display) -> ! {
    eprintln!("Render failure: {}", message);
    std::process::exit(1);
}

fn main() {
    env_logger::init();
    let matches = args();

    let config = match config(&matches) {
        Some(config) => config,
        None => fail(&"could not read the command line"),
    };
    debug!("{:?}", config);
    let renderer = Renderer::new(&config).unwrap_or_else(|e| fail(&e));
    let output = matches
        .value_of(OUTPUT)
        .map(String::from)
        .unwrap_or_else(|| format!("mandelbrot-{}.png", config.strategy));
    let repeat = matches
        .value_of(REPEAT)
        .and_then(|n| usize::from_str(n).ok())
        .unwrap_or(1);

    let mut samples = Vec::with_capacity(repeat);
    let mut last = None;
    for _ in 0..repeat {
        let started = Instant::now();
        let buffer = renderer.render().unwrap_or_else(|e| fail(&e));
        samples.push(started.elapsed());
        last = Some(buffer);
    }

    if let Some(summary) = Summary::from_samples(&samples) {
        println!("Experiment using the {} strategy", config.strategy);
        println!("{}", summary);
    }
    if let Some(buffer) = last {
        if let Err(e) = write_png(&output, &buffer) {
            fail(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_and_points_parse() {
        assert_eq!(parse_pair::<usize>("750x500", 'x'), Some((750, 500)));
        assert_eq!(parse_pair::<usize>("750,500", 'x'), None);
        assert_eq!(parse_complex("-2,-1"), Some(Complex::new(-2.0, -1.0)));
        assert_eq!(parse_complex("-2"), None);
    }

    #[test]
    fn palettes_need_three_weights() {
        assert_eq!(
            parse_palette("230,235,255"),
            Some(Palette::new(230.0, 235.0, 255.0))
        );
        assert_eq!(parse_palette("1,2"), None);
        assert_eq!(parse_palette("1,2,x"), None);
        assert_eq!(parse_palette("1,-2,3"), None);
    }

    #[test]
    fn ranges_are_inclusive() {
        assert!(validate_range("1", 1, 4, "nan", "range").is_ok());
        assert!(validate_range("4", 1, 4, "nan", "range").is_ok());
        assert_eq!(validate_range("5", 1, 4, "nan", "range"), Err("range".to_string()));
        assert_eq!(validate_range("x", 1, 4, "nan", "range"), Err("nan".to_string()));
    }
}
