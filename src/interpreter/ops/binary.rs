//! Binary operator evaluation.
//!
//! Every binary operator takes two Integer operands. Arithmetic is checked:
//! overflow raises `IntegerOverflow`, a zero divisor raises `DivisionByZero`.
//! Comparisons produce Booleans.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, SourceLocation};

impl Interpreter {
    pub(crate) fn evaluate_binary_op(
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let (a, b) = match (left, right) {
            (Value::Int(a), Value::Int(b)) => (*a, *b),
            (Value::Int(_), other) | (other, _) => {
                return Err(RuntimeError::type_error(
                    &format!("Integer operands for '{}'", op.symbol()),
                    other.kind_name(),
                    location,
                ))
            }
        };

        match op {
            BinOp::Add => Self::checked_arith(a, b, op, i64::checked_add, location),
            BinOp::Sub => Self::checked_arith(a, b, op, i64::checked_sub, location),
            BinOp::Mul => Self::checked_arith(a, b, op, i64::checked_mul, location),
            BinOp::Div | BinOp::Mod => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero {
                        operation: format!("{} {} {}", a, op.symbol(), b),
                        location,
                    });
                }
                let checked: fn(i64, i64) -> Option<i64> = if op == BinOp::Div {
                    i64::checked_div
                } else {
                    i64::checked_rem
                };
                Self::checked_arith(a, b, op, checked, location)
            }
            BinOp::Eq => Ok(Value::Bool(a == b)),
            BinOp::Ne => Ok(Value::Bool(a != b)),
            BinOp::Lt => Ok(Value::Bool(a < b)),
            BinOp::Le => Ok(Value::Bool(a <= b)),
            BinOp::Gt => Ok(Value::Bool(a > b)),
            BinOp::Ge => Ok(Value::Bool(a >= b)),
        }
    }

    #[inline]
    fn checked_arith(
        a: i64,
        b: i64,
        op: BinOp,
        f: fn(i64, i64) -> Option<i64>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        f(a, b)
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::IntegerOverflow {
                operation: format!("{} {} {}", a, op.symbol(), b),
                location,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: BinOp, a: Value, b: Value) -> Result<Value, RuntimeError> {
        Interpreter::evaluate_binary_op(op, &a, &b, SourceLocation::new(1, 1))
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(eval(BinOp::Add, Value::Int(2), Value::Int(3)), Ok(Value::Int(5)));
        assert_eq!(eval(BinOp::Div, Value::Int(7), Value::Int(2)), Ok(Value::Int(3)));
        assert_eq!(eval(BinOp::Div, Value::Int(-7), Value::Int(2)), Ok(Value::Int(-3)));
        assert_eq!(eval(BinOp::Mod, Value::Int(-7), Value::Int(3)), Ok(Value::Int(-1)));
    }

    #[test]
    fn test_comparisons_yield_booleans() {
        assert_eq!(eval(BinOp::Le, Value::Int(1), Value::Int(1)), Ok(Value::Bool(true)));
        assert_eq!(eval(BinOp::Ne, Value::Int(1), Value::Int(1)), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            eval(BinOp::Div, Value::Int(1), Value::Int(0)),
            Err(RuntimeError::DivisionByZero { .. })
        ));
        assert!(matches!(
            eval(BinOp::Mod, Value::Int(1), Value::Int(0)),
            Err(RuntimeError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(matches!(
            eval(BinOp::Mul, Value::Int(i64::MAX), Value::Int(2)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            eval(BinOp::Div, Value::Int(i64::MIN), Value::Int(-1)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_non_integer_operands() {
        let err = eval(BinOp::Add, Value::Text("a".to_string()), Value::Int(1)).unwrap_err();
        assert_eq!(err.to_string(), "Type error: expected Integer operands for '+', got Text");

        let err = eval(BinOp::Eq, Value::Bool(true), Value::Bool(true)).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeError { .. }));
    }
}
