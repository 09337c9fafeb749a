//! Loop statement execution (`while`, `for`).
//!
//! Loops are bounded only by the step ceiling: the loop statement itself
//! costs one unit, each body dispatch costs at least one more, and condition
//! tests, initializers and updates are free. `while (true) {}` therefore
//! stops exactly when the ceiling is reached.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Expr, Statement};

impl Interpreter {
    /// Executes a `while (condition) body` loop.
    pub(crate) fn execute_while(&mut self, condition: &Expr, body: &Statement) -> Result<ControlFlow, RuntimeError> {
        while self.evaluate_condition(condition)? {
            let flow = self.execute_statement(body)?;
            if matches!(flow, ControlFlow::Return(_)) {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Executes a `for (init; condition; update) body` loop.
    ///
    /// The initializer runs once without recording a Step; a missing condition
    /// is always true.
    pub(crate) fn execute_for(
        &mut self,
        init: &[Statement],
        condition: Option<&Expr>,
        update: &[Expr],
        body: &Statement,
    ) -> Result<ControlFlow, RuntimeError> {
        for stmt in init {
            match stmt {
                Statement::VarDecl {
                    declarators,
                    location,
                    ..
                } => self.execute_var_decl(declarators, *location)?,
                Statement::Expression { expr, .. } => {
                    self.evaluate_expr(expr)?;
                }
                other => {
                    return Err(RuntimeError::UnsupportedOperation {
                        message: format!("'{}' in a for initializer", other),
                        location: other.location(),
                    })
                }
            }
        }

        loop {
            if let Some(condition) = condition {
                if !self.evaluate_condition(condition)? {
                    break;
                }
            }

            let flow = self.execute_statement(body)?;
            if matches!(flow, ControlFlow::Return(_)) {
                return Ok(flow);
            }

            for expr in update {
                self.evaluate_expr(expr)?;
            }
        }

        Ok(ControlFlow::Normal)
    }
}
