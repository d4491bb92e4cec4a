use serde::{Deserialize, Serialize};

/// A declared variable, identified by its slot index. The printable name
/// is the configured prefix followed by the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(usize);

impl Var {
    pub(crate) fn new(index: usize) -> Self {
        Var(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum BinOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl BinOp {
    pub const ALL: [BinOp; 4] = [BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div];

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    /// Apply the operation with the simulated semantics: division rounds
    /// toward negative infinity, unlike C's `/`.
    pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => floor_div(lhs, rhs),
        }
    }
}

fn floor_div(lhs: i64, rhs: i64) -> i64 {
    let q = lhs / rhs;
    if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
        q - 1
    } else {
        q
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stmt {
    /// `int {var} = {value};`
    Decl { var: Var, value: i64 },
    /// `{lhs} = {lhs} {op} {rhs};`
    Assign { lhs: Var, op: BinOp, rhs: Var },
    /// `{var} = {value};`
    Reset { var: Var, value: i64 },
    /// `printf("%d", {var});`
    Print { var: Var },
}

/// The generated program: an ordered statement list plus the name prefix
/// its variables were minted under. Order reproduces execution order.
pub struct Program {
    prefix: String,
    stmts: Vec<Stmt>,
}

impl Program {
    pub fn new(prefix: &str) -> Self {
        Program {
            prefix: String::from(prefix),
            stmts: Vec::new(),
        }
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn name(&self, var: Var) -> String {
        format!("{}{}", self.prefix, var.index())
    }
}
