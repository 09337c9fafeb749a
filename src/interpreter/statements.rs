//! Statement execution implementation
//!
//! Every statement dispatch costs one unit of work, blocks and empty
//! statements included. Steps are recorded at these points:
//!
//! - expression statements and declarations: after they run (`Executed: ...`)
//! - `if`: before the condition is evaluated (`Checking condition: ...`)
//! - `return`: before the returned expression is evaluated (`Return statement`)
//!
//! Loops live in [`loops`](super::loops).

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;

impl Interpreter {
    pub(crate) fn execute_statement(&mut self, stmt: &Statement) -> Result<ControlFlow, RuntimeError> {
        let location = stmt.location();
        self.tick(location)?;

        match stmt {
            Statement::Block { statements, .. } => self.execute_block(statements),

            Statement::VarDecl { declarators, .. } => {
                self.execute_var_decl(declarators, location)?;
                self.record(location.line, format!("Executed: {}", stmt))?;
                Ok(ControlFlow::Normal)
            }

            Statement::Expression { expr, .. } => {
                self.evaluate_expr(expr)?;
                self.record(location.line, format!("Executed: {}", stmt))?;
                Ok(ControlFlow::Normal)
            }

            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => self.execute_if(condition, then_branch, else_branch.as_deref(), location),

            Statement::While {
                condition, body, ..
            } => self.execute_while(condition, body),

            Statement::For {
                init,
                condition,
                update,
                body,
                ..
            } => self.execute_for(init, condition.as_ref(), update, body),

            Statement::Return { expr, .. } => {
                self.record(location.line, "Return statement")?;
                let value = match expr {
                    Some(expr) => self.evaluate_expr(expr)?,
                    None => Value::Unit,
                };
                Ok(ControlFlow::Return(value))
            }

            Statement::Empty { .. } => Ok(ControlFlow::Normal),
        }
    }

    /// Run statements in order, stopping at the first `return`
    pub(crate) fn execute_block(&mut self, statements: &[Statement]) -> Result<ControlFlow, RuntimeError> {
        for stmt in statements {
            let flow = self.execute_statement(stmt)?;
            if matches!(flow, ControlFlow::Return(_)) {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Bind each declarator in the top frame: its initializer's value, or the type default
    pub(crate) fn execute_var_decl(
        &mut self,
        declarators: &[Declarator],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        for decl in declarators {
            let value = match &decl.init {
                Some(init) => self.evaluate_expr(init)?,
                None => Value::default_for(&decl.var_type),
            };
            self.current_frame_mut(location)?.declare(&decl.name, value);
        }
        Ok(())
    }

    fn execute_if(
        &mut self,
        condition: &Expr,
        then_branch: &Statement,
        else_branch: Option<&Statement>,
        location: SourceLocation,
    ) -> Result<ControlFlow, RuntimeError> {
        self.record(location.line, format!("Checking condition: {}", condition))?;

        if self.evaluate_condition(condition)? {
            self.execute_statement(then_branch)
        } else if let Some(else_branch) = else_branch {
            self.execute_statement(else_branch)
        } else {
            Ok(ControlFlow::Normal)
        }
    }

    /// Evaluate a condition that must produce a Boolean
    pub(crate) fn evaluate_condition(&mut self, condition: &Expr) -> Result<bool, RuntimeError> {
        let value = self.evaluate_expr(condition)?;
        value
            .as_bool()
            .ok_or_else(|| RuntimeError::type_error("Boolean", value.kind_name(), condition.location()))
    }
}
