use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Deserialize;

use crate::tree::{BinOp, Program, Stmt};
use crate::vars::VarTable;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of variables to declare.
    pub n_variables: usize,
    /// Number of arithmetic operations to generate.
    pub n_operations: usize,
    /// Variable names are this prefix followed by the slot index.
    pub prefix: String,
    /// Operators drawn from during the operation phase.
    pub operators: Vec<BinOp>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_variables: 50,
            n_operations: 1000,
            prefix: String::from("var"),
            operators: BinOp::ALL.to_vec(),
        }
    }
}

/// Builds a program in three strictly sequential phases: declare every
/// variable, generate the operation trace, print every variable.
pub struct ProgramGenerator<R: Rng> {
    rng: R,
    config: GeneratorConfig,
}

impl<R: Rng> ProgramGenerator<R> {
    pub fn new(config: GeneratorConfig, rng: R) -> Self {
        Self { rng, config }
    }

    pub fn generate(&mut self) -> Program {
        let mut prog = Program::new(&self.config.prefix);
        let mut vars = VarTable::new();

        for _ in 0..self.config.n_variables {
            let value = self.rng.random_range(0..=100);
            let var = vars.declare(value);
            prog.push(Stmt::Decl { var, value });
        }

        // With no variables or no operators there is nothing to draw;
        // the operation phase degrades to nothing and the program stays
        // well formed.
        if !vars.is_empty() && !self.config.operators.is_empty() {
            for _ in 0..self.config.n_operations {
                self.operation(&mut prog, &mut vars);
            }
        }

        for var in vars.vars() {
            prog.push(Stmt::Print { var });
        }

        prog
    }

    fn operation(&mut self, prog: &mut Program, vars: &mut VarTable) {
        let lhs = vars.random_var(&mut self.rng);
        let rhs = vars.random_var(&mut self.rng);
        let mut op = *self.config.operators.choose(&mut self.rng).unwrap();

        // The emitted program runs under C semantics where dividing by
        // zero is undefined, so a zero-valued divisor demotes the
        // operation to an addition.
        if op == BinOp::Div && vars.value(rhs) == 0 {
            op = BinOp::Add;
        }

        let value = op.apply(vars.value(lhs), vars.value(rhs));
        vars.set(lhs, value);
        prog.push(Stmt::Assign { lhs, op, rhs });

        // True for every value except exactly 10000, so almost every
        // assignment is chased by a reset to a small literal. Existing
        // corpora depend on this shape; see DESIGN.md before "fixing"
        // the bound.
        if value > 10000 || value < 10000 {
            let fresh = self.rng.random_range(0..=100);
            vars.set(lhs, fresh);
            prog.push(Stmt::Reset { var: lhs, value: fresh });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    use crate::tree::Var;

    fn generate(config: GeneratorConfig, seed: u64) -> Program {
        ProgramGenerator::new(config, StdRng::seed_from_u64(seed)).generate()
    }

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            n_variables: 10,
            n_operations: 200,
            ..GeneratorConfig::default()
        }
    }

    /// Re-execute the statement trace and check every invariant the
    /// generator promises about it.
    fn replay(prog: &Program, config: &GeneratorConfig) {
        let mut values: HashMap<Var, i64> = HashMap::new();
        for stmt in prog.stmts() {
            match *stmt {
                Stmt::Decl { var, value } => {
                    assert!((0..=100).contains(&value));
                    assert!(var.index() < config.n_variables);
                    assert!(values.insert(var, value).is_none(), "redeclared variable");
                }
                Stmt::Assign { lhs, op, rhs } => {
                    let r = values[&rhs];
                    if op == BinOp::Div {
                        assert_ne!(r, 0, "divide by a zero-valued variable");
                    }
                    let v = op.apply(values[&lhs], r);
                    values.insert(lhs, v);
                }
                Stmt::Reset { var, value } => {
                    assert!((0..=100).contains(&value));
                    values.insert(var, value);
                }
                Stmt::Print { var } => {
                    assert!(values.contains_key(&var));
                }
            }
        }
        assert_eq!(values.len(), config.n_variables);
    }

    #[test]
    fn statement_counts_match_the_configuration() {
        let config = small_config();
        let prog = generate(config.clone(), 7);

        let decls = prog.stmts().iter().filter(|s| matches!(s, Stmt::Decl { .. })).count();
        let assigns = prog.stmts().iter().filter(|s| matches!(s, Stmt::Assign { .. })).count();
        let resets = prog.stmts().iter().filter(|s| matches!(s, Stmt::Reset { .. })).count();
        let prints = prog.stmts().iter().filter(|s| matches!(s, Stmt::Print { .. })).count();

        assert_eq!(decls, config.n_variables);
        assert_eq!(assigns, config.n_operations);
        assert_eq!(prints, config.n_variables);
        // The reset condition only misses a value of exactly 10000, which a
        // 10-variable run of small sums essentially never produces.
        assert!(resets <= config.n_operations);
        assert!(resets > config.n_operations / 2);

        replay(&prog, &config);
    }

    #[test]
    fn every_assignment_not_landing_on_10000_is_followed_by_a_reset() {
        let config = small_config();
        let prog = generate(config, 21);

        let mut values: HashMap<Var, i64> = HashMap::new();
        let stmts = prog.stmts();
        for (i, stmt) in stmts.iter().enumerate() {
            match *stmt {
                Stmt::Decl { var, value } | Stmt::Reset { var, value } => {
                    values.insert(var, value);
                }
                Stmt::Assign { lhs, op, rhs } => {
                    let v = op.apply(values[&lhs], values[&rhs]);
                    values.insert(lhs, v);
                    if v != 10000 {
                        assert!(
                            matches!(stmts[i + 1], Stmt::Reset { var, .. } if var == lhs),
                            "assignment at {i} not chased by a reset"
                        );
                    }
                }
                Stmt::Print { .. } => {}
            }
        }
    }

    #[test]
    fn variable_names_follow_the_prefix_pattern() {
        let config = GeneratorConfig {
            n_variables: 4,
            n_operations: 30,
            prefix: String::from("t"),
            ..GeneratorConfig::default()
        };
        let prog = generate(config, 3);
        for i in 0..4 {
            assert_eq!(prog.name(Var::new(i)), format!("t{i}"));
        }
        for line in prog.emit().lines() {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix("int t").or_else(|| trimmed.strip_prefix("t")) {
                let index: usize = rest
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
                    .parse()
                    .unwrap();
                assert!(index < 4, "out-of-range variable in {line:?}");
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_file() {
        let a = generate(small_config(), 99).emit();
        let b = generate(small_config(), 99).emit();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_share_the_structural_shape() {
        // Restricted to + and - the working values stay under 201, the
        // reset rule fires after every assignment, and the statement-kind
        // sequence is the same for any seed.
        let config = GeneratorConfig {
            operators: vec![BinOp::Add, BinOp::Sub],
            ..small_config()
        };
        let kinds = |prog: &Program| {
            prog.stmts()
                .iter()
                .map(|s| match s {
                    Stmt::Decl { .. } => 0u8,
                    Stmt::Assign { .. } => 1,
                    Stmt::Reset { .. } => 2,
                    Stmt::Print { .. } => 3,
                })
                .collect::<Vec<_>>()
        };
        let a = kinds(&generate(config.clone(), 1));
        let b = kinds(&generate(config, 2));
        assert_eq!(a, b);
        // Phases never interleave.
        assert!(a.windows(2).all(|w| match (w[0], w[1]) {
            (0, k) => k <= 1,
            (3, k) => k == 3,
            _ => true,
        }));
    }

    #[test]
    fn misconfiguration_degrades_to_a_smaller_program() {
        let no_vars = GeneratorConfig {
            n_variables: 0,
            ..small_config()
        };
        let prog = generate(no_vars, 5);
        assert!(prog.stmts().is_empty());

        let no_ops = GeneratorConfig {
            operators: vec![],
            ..small_config()
        };
        let prog = generate(no_ops.clone(), 5);
        assert!(!prog
            .stmts()
            .iter()
            .any(|s| matches!(s, Stmt::Assign { .. } | Stmt::Reset { .. })));
        replay(&prog, &no_ops);
    }

    #[test]
    fn config_defaults_match_the_reference_constants() {
        let config = GeneratorConfig::default();
        assert_eq!(config.n_variables, 50);
        assert_eq!(config.n_operations, 1000);
        assert_eq!(config.prefix, "var");
        assert_eq!(config.operators, BinOp::ALL.to_vec());
    }

    #[test]
    fn config_parses_from_partial_toml() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            n_variables = 4
            operators = ["+", "/"]
            "#,
        )
        .unwrap();
        assert_eq!(config.n_variables, 4);
        assert_eq!(config.n_operations, 1000);
        assert_eq!(config.prefix, "var");
        assert_eq!(config.operators, vec![BinOp::Add, BinOp::Div]);
    }
}
