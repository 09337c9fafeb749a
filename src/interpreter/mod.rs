//! Interpreter execution engine
//!
//! - [`engine`]: the [`Interpreter`](engine::Interpreter), work accounting and method activation
//! - [`errors`]: runtime error types
//! - [`recursion`]: per-method depth ceiling and the call log
//! - [`config`]: analysis knobs and the recursion fallback policy
//! - [`cancel`]: cooperative cancellation token
//!
//! # Execution Model
//!
//! The interpreter walks the AST of one method at a time against the top
//! frame of the call stack. Recording points append a Step to the trace;
//! every statement dispatch and method invocation consumes one unit of the
//! step ceiling.

pub mod cancel;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod recursion;

mod builtins;
mod calls;
mod expressions;
mod loops;
mod ops;
mod statements;

#[cfg(test)]
mod tests;
