//! # Introduction
//!
//! tracewalk runs small programs written in a Java-like subset (one class of
//! static methods over integers, booleans, strings and arrays) and returns a
//! replayable trace: one Step per recording point with the top frame's
//! bindings, the call-stack label and a description, plus captured output.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → CompilationUnit → Program → Interpreter → Trace → AnalysisResult
//!                                  └──────→ Complexity ─────────────────────────┘
//! ```
//!
//! 1. [`parser`] tokenises the source and builds a [`parser::ast::CompilationUnit`].
//! 2. [`program`] indexes methods by name and checks for the entry method.
//! 3. [`interpreter`] walks method bodies against a [`memory::stack::CallStack`],
//!    bounded by a step ceiling and a per-method recursion ceiling.
//! 4. [`snapshot`] turns the top frame into [`snapshot::Step`]s and collects output.
//! 5. [`analysis`] estimates time and space complexity from the source alone.
//! 6. [`session`] ties it together; [`analyze`] never fails, errors end up in
//!    the result as a diagnostic Step.
//!
//! ```
//! let result = tracewalk::analyze(
//!     "class Main { static void main() { int x = 5; int y = x * 2; } }",
//! );
//! assert!(result.success);
//! assert_eq!(result.trace.len(), 3);
//! assert_eq!(result.trace[2].variables.value_of("y"), Some("10"));
//! ```

pub mod analysis;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod program;
pub mod session;
pub mod snapshot;

pub use analysis::Complexity;
pub use interpreter::cancel::CancellationToken;
pub use interpreter::config::{AnalyzerConfig, RecursionPolicy};
pub use session::{analyze, AnalysisError, AnalysisResult, Analyzer};
