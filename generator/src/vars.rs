use rand::Rng;

use crate::tree::Var;

/// Simulated values of the declared variables. This table only lives for
/// the duration of a generation run; what persists is the statement trace
/// of its mutations.
pub struct VarTable {
    values: Vec<i64>,
}

impl VarTable {
    pub fn new() -> Self {
        VarTable { values: Vec::new() }
    }

    pub fn declare(&mut self, value: i64) -> Var {
        let var = Var::new(self.values.len());
        self.values.push(value);
        var
    }

    pub fn value(&self, var: Var) -> i64 {
        self.values[var.index()]
    }

    pub fn set(&mut self, var: Var, value: i64) {
        self.values[var.index()] = value;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn vars(&self) -> impl Iterator<Item = Var> {
        (0..self.values.len()).map(Var::new)
    }

    /// Uniform draw over the declared variables, with replacement across
    /// calls. Panics on an empty table; callers skip the operation phase
    /// when nothing is declared.
    pub fn random_var<R: Rng>(&self, rng: &mut R) -> Var {
        Var::new(rng.random_range(0..self.values.len()))
    }
}
