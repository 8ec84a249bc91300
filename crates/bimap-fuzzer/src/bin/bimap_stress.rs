//! `bimap-stress`: run the differential stress test from the command line.
//!
//! Usage:
//!   bimap-stress [steps] [key_space] [seed]
//!
//! Defaults to 10000 steps over 16 keys per side with a random seed. The
//! seed is printed so a failing run can be replayed. Set
//! `RUST_LOG=bimap_fuzzer=debug` (or `trace`) for progress output.

use std::str::FromStr;

use bimap_fuzzer::{run, FuzzConfig, MAX_KEY_SPACE};

fn parse_arg<T: FromStr>(args: &[String], idx: usize, name: &str) -> Option<T> {
    let raw = args.get(idx)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("Invalid {name}: {raw}");
            std::process::exit(2);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let defaults = FuzzConfig::default();
    let key_space = parse_arg(&args, 2, "key space").unwrap_or(defaults.key_space);
    if !(1..=MAX_KEY_SPACE).contains(&key_space) {
        eprintln!("Invalid key space: {key_space} (expected 1..={MAX_KEY_SPACE})");
        std::process::exit(2);
    }
    let config = FuzzConfig {
        steps: parse_arg(&args, 1, "step count").unwrap_or(defaults.steps),
        key_space,
        seed: parse_arg(&args, 3, "seed").or(defaults.seed),
    };

    match run(&config) {
        Ok(report) => println!("{report}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
