use arith_gen::{generate_with_config, GeneratorConfig};
use similar::TextDiff;
use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use short_uuid::ShortUuid;

mod run;
use crate::run::run;

#[derive(Parser, Debug)]
struct Args {
    /// Script that compiles and runs a C file with the toolchain under test
    target: PathBuf,
    /// Script that does the same with the gold toolchain
    gold: PathBuf,
    /// Directory where mismatching programs are kept
    out: PathBuf,

    /// Path to .toml configuration for the generator
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of trials to run; runs forever when omitted
    #[arg(short, long)]
    num_trials: Option<usize>,
    /// How long to wait before timing out a run, in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
    /// Master seed, to replay a whole session
    #[arg(short, long)]
    seed: Option<u64>,
}

enum Termination {
    Match,
    Mismatch(String),
}

struct TrialResult {
    termination: Termination,
    both_ended: bool,
    both_compiled: bool,
}

fn trial(cli: &Args, config: &GeneratorConfig, seed: u64) -> Result<TrialResult> {
    // generate!
    let program = generate_with_config(config.clone(), Some(seed));
    // run them!
    let gold = run(&cli.gold, &program, cli.timeout)?;
    let target = run(&cli.target, &program, cli.timeout)?;
    // diff them!
    let diff = TextDiff::from_lines(&target.output, &gold.output);
    Ok(TrialResult {
        termination: if diff.ratio() == 1.0 {
            Termination::Match
        } else {
            Termination::Mismatch(program)
        },
        both_ended: gold.termination && target.termination,
        both_compiled: gold.compilation && target.compilation,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading configuration {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("parsing configuration {}", path.display()))
        }
        None => Ok(GeneratorConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Args::parse();

    let configuration = load_config(cli.config.as_ref())?;
    ensure!(
        cli.out.is_dir(),
        "output path {} is not a directory",
        cli.out.display()
    );

    // Trials draw their seeds from here, so one master seed replays a
    // whole session.
    let mut seeds = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut num_trials = 0usize;
    let mut num_failures = 0usize;
    let mut num_hangs = 0usize;
    let mut num_rejections = 0usize;

    loop {
        if let Some(n) = cli.num_trials {
            if num_trials == n {
                break;
            }
        }
        num_trials += 1;

        let seed: u64 = seeds.random();
        let result = trial(&cli, &configuration, seed)?;
        if !result.both_ended {
            num_hangs += 1;
        }
        if !result.both_compiled {
            num_rejections += 1;
        }
        if let Termination::Mismatch(program) = result.termination {
            num_failures += 1;
            let path = cli.out.join(format!("failure-{}.c", ShortUuid::generate()));
            fs::write(&path, &program)
                .with_context(|| format!("saving failing program to {}", path.display()))?;
            println!(
                "{} seed {} saved to {}",
                "mismatch".red().bold(),
                seed,
                path.display()
            );
        }
    }

    println!(
        "{} {} trials, {} mismatches, {} rejections, {} hangs",
        "done".green().bold(),
        num_trials,
        num_failures,
        num_rejections,
        num_hangs
    );
    Ok(())
}
