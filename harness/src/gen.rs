use arith_gen::{generate_with_config, GeneratorConfig};
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Where to write the generated program
    #[arg(default_value = "random.c")]
    out: PathBuf,

    /// Path to .toml configuration for the generator
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Random seed; omitted means a fresh program every run
    #[arg(short, long)]
    seed: Option<u64>,
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
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let code = generate_with_config(config, args.seed);
    fs::write(&args.out, code).with_context(|| format!("writing {}", args.out.display()))?;
    println!("Generated C code saved to {}", args.out.display());
    Ok(())
}
