//! Program model
//!
//! A [`Program`] is the flat, immutable method namespace built once from a
//! parsed [`CompilationUnit`]. Names are unique: overloading is rejected.

use crate::parser::ast::{CompilationUnit, Method};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Failures while turning a parsed unit into a runnable program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("No {entry} method found")]
    MissingEntryMethod { entry: String },

    #[error("Method '{name}' is declared more than once (line {first_line} and line {second_line})")]
    DuplicateMethod {
        name: String,
        first_line: usize,
        second_line: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Program {
    pub class_name: String,
    entry: String,
    methods: FxHashMap<String, Method>,
}

impl Program {
    /// Index the unit's methods by name and check that `entry` exists
    pub fn build(unit: CompilationUnit, entry: &str) -> Result<Self, ProgramError> {
        let mut methods: FxHashMap<String, Method> = FxHashMap::default();

        for method in unit.methods {
            if let Some(existing) = methods.get(&method.name) {
                return Err(ProgramError::DuplicateMethod {
                    name: method.name.clone(),
                    first_line: existing.line(),
                    second_line: method.line(),
                });
            }
            methods.insert(method.name.clone(), method);
        }

        if !methods.contains_key(entry) {
            return Err(ProgramError::MissingEntryMethod {
                entry: entry.to_string(),
            });
        }

        Ok(Program {
            class_name: unit.class_name,
            entry: entry.to_string(),
            methods,
        })
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn entry_name(&self) -> &str {
        &self.entry
    }

    /// The entry method; presence is checked by [`Program::build`]
    pub fn entry(&self) -> Option<&Method> {
        self.methods.get(&self.entry)
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn test_build_indexes_methods() {
        let unit = parse_source("class A { static int f() { return 1; } static void main() { } }").unwrap();
        let program = Program::build(unit, "main").unwrap();

        assert_eq!(program.class_name, "A");
        assert_eq!(program.method_count(), 2);
        assert!(program.method("f").is_some());
        assert_eq!(program.entry().map(|m| m.name.as_str()), Some("main"));
    }

    #[test]
    fn test_missing_entry() {
        let unit = parse_source("class A { static int f() { return 1; } }").unwrap();
        let err = Program::build(unit, "main").unwrap_err();

        assert_eq!(err.to_string(), "No main method found");
    }

    #[test]
    fn test_duplicate_method() {
        let unit = parse_source("class A {\n void f() {}\n void f() {}\n void main() {} }").unwrap();
        let err = Program::build(unit, "main").unwrap_err();

        assert_eq!(
            err,
            ProgramError::DuplicateMethod {
                name: "f".to_string(),
                first_line: 2,
                second_line: 3,
            }
        );
    }

    #[test]
    fn test_custom_entry() {
        let unit = parse_source("class A { static void run() { } }").unwrap();
        let program = Program::build(unit, "run").unwrap();
        assert_eq!(program.entry_name(), "run");
    }
}
