use crate::tree::{Program, Stmt};

/// Accumulates the output text line by line, tracking brace depth.
pub struct Emitter {
    indent: usize,
    output: String,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter {
            indent: 0,
            output: String::new(),
        }
    }

    pub fn line(&mut self, s: &str) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(s);
    }

    /// An empty line, with no trailing indentation.
    pub fn blank(&mut self) {
        self.output.push('\n');
    }

    pub fn enter_block(&mut self) {
        self.indent += 1;
    }

    pub fn exit_block(&mut self) {
        self.indent -= 1;
    }

    pub fn finish(self) -> String {
        self.output
    }
}

pub trait Emit {
    fn emit(&self, e: &mut Emitter, prog: &Program);
}

impl Emit for Stmt {
    fn emit(&self, e: &mut Emitter, prog: &Program) {
        match self {
            Stmt::Decl { var, value } => {
                e.line(&format!("int {} = {};", prog.name(*var), value));
            }
            Stmt::Assign { lhs, op, rhs } => {
                let lhs = prog.name(*lhs);
                e.line(&format!("{} = {} {} {};", lhs, lhs, op.symbol(), prog.name(*rhs)));
            }
            Stmt::Reset { var, value } => {
                e.line(&format!("{} = {};", prog.name(*var), value));
            }
            Stmt::Print { var } => {
                e.line(&format!("printf(\"%d\", {});", prog.name(*var)));
            }
        }
    }
}

impl Program {
    /// Render the full C translation unit. A blank line separates the
    /// declaration block from the operation block; no trailing newline.
    pub fn emit(&self) -> String {
        let mut e = Emitter::new();
        e.line("#include <stdio.h>");
        e.blank();
        e.line("int main() {");
        e.enter_block();
        // Declarations are always the leading run of the statement list;
        // the blank separator is emitted even when the run is empty.
        let mut stmts = self.stmts().iter().peekable();
        while let Some(Stmt::Decl { .. }) = stmts.peek() {
            stmts.next().unwrap().emit(&mut e, self);
        }
        e.blank();
        for stmt in stmts {
            stmt.emit(&mut e, self);
        }
        e.blank();
        e.line("return 0;");
        e.exit_block();
        e.line("}");
        e.finish()
    }
}
