//! Built-in output methods.
//!
//! `print` and `println` (bare or qualified, e.g. `System.out.println`) write
//! their arguments' printed forms to the output sink, concatenated without
//! separators. They push no frame, record no Step and cost no work; the
//! statement containing them records its own Step.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::Expr;

impl Interpreter {
    pub(crate) fn builtin_print(&mut self, args: &[Expr], newline: bool) -> Result<Value, RuntimeError> {
        let mut text = String::new();
        for arg in args {
            let value = self.evaluate_expr(arg)?;
            text.push_str(&value.to_string());
        }

        if newline {
            self.output.println(&text);
        } else {
            self.output.print(&text);
        }

        Ok(Value::Unit)
    }
}
