//! Runtime value representation
//!
//! [`Value`] is a closed tagged union; every arithmetic, formatting and
//! rendering path matches on it exhaustively.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 64-bit signed integer (`int` and `long`)
//! - [`Value::Bool`]: `boolean`
//! - [`Value::Text`]: `String`
//! - [`Value::Array`]: shared, mutable sequence of values
//! - [`Value::Unit`]: result of a `void` method
//!
//! # Array sharing
//!
//! Arrays are reference-counted: `int[] b = a;` makes `a` and `b` the same
//! array, and element writes through either name are visible through both.
//! Snapshots never hold an array handle, only its rendering.

use crate::parser::ast::TypeTag;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle to array storage shared between bindings
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Text(String),
    Array(ArrayRef),
    #[default]
    Unit,
}

impl Value {
    /// Wrap freshly built elements in new array storage
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Default value bound for a declared type: `0`, `false`, `""`, an empty array or Unit
    pub fn default_for(ty: &TypeTag) -> Self {
        match ty {
            TypeTag::Int => Value::Int(0),
            TypeTag::Boolean => Value::Bool(false),
            TypeTag::Text => Value::Text(String::new()),
            TypeTag::Array(_) => Value::array(Vec::new()),
            TypeTag::Void => Value::Unit,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Display type tag shown next to a binding in a Step
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "String",
            Value::Array(_) => "ARRAY",
            Value::Unit => "void",
        }
    }

    /// Operand kind used in type error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Integer",
            Value::Bool(_) => "Boolean",
            Value::Text(_) => "Text",
            Value::Array(_) => "Array",
            Value::Unit => "Unit",
        }
    }

    /// Point-in-time rendering stored in a Step.
    ///
    /// Top-level arrays render as their elements joined by `", "`; arrays
    /// nested inside them are bracketed so the structure stays readable.
    pub fn render(&self) -> String {
        match self {
            Value::Array(items) => join_elements(&items.borrow()),
            Value::Unit => "null".to_string(),
            other => other.to_string(),
        }
    }
}

fn join_elements(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Printed form used by `print`/`println` and for nested array elements
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Array(items) => write!(f, "[{}]", join_elements(&items.borrow())),
            Value::Unit => write!(f, "null"),
        }
    }
}
