//! Method invocation.
//!
//! Program methods win over builtins of the same name. A call costs one unit
//! of work once its arguments are evaluated, whether or not the recursion
//! governor lets the body run. The total frame count is capped separately from
//! the per-method recursion ceiling.

use crate::interpreter::config::RecursionPolicy;
use crate::interpreter::constants::{BUILTIN_PRINT, BUILTIN_PRINTLN};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{Expr, SourceLocation};
use tracing::warn;

impl Interpreter {
    pub(crate) fn evaluate_call(
        &mut self,
        name: &str,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let program = self.program();
        let Some(method) = program.method(name) else {
            return match name {
                BUILTIN_PRINT => self.builtin_print(args, false),
                BUILTIN_PRINTLN => self.builtin_print(args, true),
                _ => Err(RuntimeError::UndefinedMethod {
                    name: name.to_string(),
                    location,
                }),
            };
        };

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate_expr(arg)?);
        }

        self.tick(location)?;

        if values.len() != method.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch {
                method: name.to_string(),
                expected: method.params.len(),
                got: values.len(),
                location,
            });
        }

        if self.stack.depth() >= self.config.max_call_depth {
            warn!(method = name, limit = self.config.max_call_depth, "call depth limit reached");
            return Err(RuntimeError::CallDepthExceeded {
                method: name.to_string(),
                limit: self.config.max_call_depth,
                location,
            });
        }

        if !self.governor.can_enter(name) {
            return match self.config.recursion_policy {
                RecursionPolicy::TypeDefault => {
                    let fallback = Value::default_for(&method.return_type);
                    self.governor.substitute(name, &values, &fallback);
                    Ok(fallback)
                }
                RecursionPolicy::Fail => {
                    warn!(method = name, ceiling = self.governor.ceiling(), "recursion ceiling reached");
                    Err(RuntimeError::RecursionLimitExceeded {
                        method: name.to_string(),
                        depth: self.governor.depth(name),
                        location,
                    })
                }
            };
        }

        self.activate(method, values)
    }
}
