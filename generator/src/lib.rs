mod emit;
mod generator;
mod tree;
mod vars;

pub use crate::emit::{Emit, Emitter};
pub use crate::generator::{GeneratorConfig, ProgramGenerator};
pub use crate::tree::{BinOp, Program, Stmt, Var};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generate one program, seeded for reproducibility when `seed` is given.
pub fn generate_with_config(config: GeneratorConfig, seed: Option<u64>) -> String {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    ProgramGenerator::new(config, rng).generate().emit()
}

pub fn generate() -> String {
    generate_with_config(GeneratorConfig::default(), None)
}
