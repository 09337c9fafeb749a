//! Assignment to variables and array elements.
//!
//! A target is resolved to a [`Place`] before the right-hand side runs, so
//! the array and index of `a[i] = v` are evaluated once, left to right.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{ArrayRef, Value};
use crate::parser::ast::*;

/// A writable location in the top frame
pub(crate) enum Place {
    Variable(String),
    Element { items: ArrayRef, index: i64 },
}

impl Interpreter {
    /// Resolve an assignment target; plain names must already be bound
    pub(crate) fn resolve_place(&mut self, target: &Expr, location: SourceLocation) -> Result<Place, RuntimeError> {
        match target {
            Expr::Variable(name, loc) => {
                if self.current_frame(*loc)?.is_bound(name) {
                    Ok(Place::Variable(name.clone()))
                } else {
                    Err(RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        location: *loc,
                    })
                }
            }
            Expr::ArrayAccess { array, index, .. } => {
                let items = self.evaluate_array(array)?;
                let index = self.evaluate_int(index)?;
                Ok(Place::Element { items, index })
            }
            Expr::Enclosed { inner, .. } => self.resolve_place(inner, location),
            other => Err(RuntimeError::InvalidAssignmentTarget {
                target: other.to_string(),
                location,
            }),
        }
    }

    pub(crate) fn read_place(&self, place: &Place, location: SourceLocation) -> Result<Value, RuntimeError> {
        match place {
            Place::Variable(name) => self.read_variable(name, location),
            Place::Element { items, index } => {
                let slot = Self::checked_index(items, *index, location)?;
                let value = items.borrow()[slot].clone();
                Ok(value)
            }
        }
    }

    pub(crate) fn write_place(&mut self, place: &Place, value: Value, location: SourceLocation) -> Result<(), RuntimeError> {
        match place {
            Place::Variable(name) => {
                let frame = self.current_frame_mut(location)?;
                match frame.get_mut(name) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        location,
                    }),
                }
            }
            Place::Element { items, index } => {
                let slot = Self::checked_index(items, *index, location)?;
                items.borrow_mut()[slot] = value;
                Ok(())
            }
        }
    }

    /// `target = value`; evaluates to the assigned value
    pub(crate) fn execute_assignment(
        &mut self,
        target: &Expr,
        value: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let place = self.resolve_place(target, location)?;
        let value = self.evaluate_expr(value)?;
        self.write_place(&place, value.clone(), location)?;
        Ok(value)
    }

    /// `target op= value`; evaluates to the stored result
    pub(crate) fn execute_compound_assignment(
        &mut self,
        target: &Expr,
        op: BinOp,
        value: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let place = self.resolve_place(target, location)?;
        let current = self.read_place(&place, location)?;
        let rhs = self.evaluate_expr(value)?;
        let result = Self::evaluate_binary_op(op, &current, &rhs, location)?;
        self.write_place(&place, result.clone(), location)?;
        Ok(result)
    }
}
