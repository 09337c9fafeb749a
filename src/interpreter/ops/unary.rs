//! Unary operator evaluation

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;

impl Interpreter {
    pub(crate) fn evaluate_unary_op(
        &mut self,
        op: UnOp,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            UnOp::Neg => {
                let n = self.evaluate_int(operand)?;
                n.checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::IntegerOverflow {
                        operation: format!("-{}", n),
                        location,
                    })
            }
            UnOp::Not => {
                let value = self.evaluate_expr(operand)?;
                value
                    .as_bool()
                    .map(|b| Value::Bool(!b))
                    .ok_or_else(|| RuntimeError::type_error("Boolean", value.kind_name(), location))
            }
            UnOp::PreInc | UnOp::PreDec | UnOp::PostInc | UnOp::PostDec => {
                self.evaluate_inc_dec_op(op, operand, location)
            }
        }
    }

    /// `++`/`--` on an Integer variable; prefix yields the new value, postfix the old one
    fn evaluate_inc_dec_op(
        &mut self,
        op: UnOp,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let name = match operand {
            Expr::Variable(name, _) => name,
            other => {
                return Err(RuntimeError::InvalidAssignmentTarget {
                    target: other.to_string(),
                    location,
                })
            }
        };

        let old = match self.read_variable(name, location)? {
            Value::Int(n) => n,
            other => return Err(RuntimeError::type_error("Integer", other.kind_name(), location)),
        };

        let (delta, symbol) = match op {
            UnOp::PreInc | UnOp::PostInc => (1, "++"),
            _ => (-1, "--"),
        };
        let new = old.checked_add(delta).ok_or_else(|| RuntimeError::IntegerOverflow {
            operation: format!("{}{}", name, symbol),
            location,
        })?;

        self.current_frame_mut(location)?.declare(name, Value::Int(new));

        Ok(Value::Int(match op {
            UnOp::PreInc | UnOp::PreDec => new,
            _ => old,
        }))
    }
}
