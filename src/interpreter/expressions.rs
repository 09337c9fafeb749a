//! Expression evaluation.
//!
//! Expressions never record Steps themselves; method calls nested inside them
//! get the same frame, Step and recursion handling as any other call.

use crate::interpreter::constants::LENGTH_FIELD;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{ArrayRef, Value};
use crate::parser::ast::*;

impl Interpreter {
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::IntLiteral(n, _) => Ok(Value::Int(*n)),
            Expr::BoolLiteral(b, _) => Ok(Value::Bool(*b)),
            Expr::StringLiteral(s, _) => Ok(Value::Text(s.clone())),

            Expr::Variable(name, location) => self.read_variable(name, *location),

            Expr::Enclosed { inner, .. } => self.evaluate_expr(inner),

            Expr::ArrayLiteral { elements, location } => {
                self.allocate(elements.len(), *location)?;
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.evaluate_expr(element)?);
                }
                Ok(Value::array(values))
            }

            Expr::NewArray {
                element_type,
                size,
                location,
            } => {
                let size = self.evaluate_int(size)?;
                let length = usize::try_from(size).map_err(|_| RuntimeError::UnsupportedOperation {
                    message: format!("negative array size {}", size),
                    location: *location,
                })?;
                self.allocate(length, *location)?;
                Ok(Value::array(
                    (0..length).map(|_| Value::default_for(element_type)).collect(),
                ))
            }

            Expr::ArrayAccess {
                array,
                index,
                location,
            } => {
                let items = self.evaluate_array(array)?;
                let index = self.evaluate_int(index)?;
                let slot = Self::checked_index(&items, index, *location)?;
                let value = items.borrow()[slot].clone();
                Ok(value)
            }

            Expr::FieldAccess {
                object,
                field,
                location,
            } => {
                if field != LENGTH_FIELD {
                    return Err(RuntimeError::UnsupportedOperation {
                        message: format!("field access '{}'", expr),
                        location: *location,
                    });
                }
                let items = self.evaluate_array(object)?;
                let length = items.borrow().len();
                Ok(Value::Int(length as i64))
            }

            Expr::Assignment {
                target,
                value,
                location,
            } => self.execute_assignment(target, value, *location),

            Expr::CompoundAssignment {
                target,
                op,
                value,
                location,
            } => self.execute_compound_assignment(target, *op, value, *location),

            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let left_val = self.evaluate_expr(left)?;
                let right_val = self.evaluate_expr(right)?;
                Self::evaluate_binary_op(*op, &left_val, &right_val, *location)
            }

            Expr::UnaryOp {
                op,
                operand,
                location,
            } => self.evaluate_unary_op(*op, operand, *location),

            Expr::MethodCall {
                name,
                args,
                location,
                ..
            } => self.evaluate_call(name, args, *location),
        }
    }

    /// Read `name` from the top frame only
    pub(crate) fn read_variable(&self, name: &str, location: SourceLocation) -> Result<Value, RuntimeError> {
        self.current_frame(location)?
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            })
    }

    pub(crate) fn evaluate_int(&mut self, expr: &Expr) -> Result<i64, RuntimeError> {
        let value = self.evaluate_expr(expr)?;
        value
            .as_int()
            .ok_or_else(|| RuntimeError::type_error("Integer", value.kind_name(), expr.location()))
    }

    pub(crate) fn evaluate_array(&mut self, expr: &Expr) -> Result<ArrayRef, RuntimeError> {
        match self.evaluate_expr(expr)? {
            Value::Array(items) => Ok(items),
            other => Err(RuntimeError::type_error("Array", other.kind_name(), expr.location())),
        }
    }

    /// Bounds-check `index` against the array, negative indices included
    pub(crate) fn checked_index(
        items: &ArrayRef,
        index: i64,
        location: SourceLocation,
    ) -> Result<usize, RuntimeError> {
        let length = items.borrow().len();
        usize::try_from(index)
            .ok()
            .filter(|&slot| slot < length)
            .ok_or(RuntimeError::IndexOutOfRange {
                index,
                length,
                location,
            })
    }
}
