//! Source parser
//!
//! Transforms program text into the structured representation the interpreter walks:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → [`ast::CompilationUnit`])
//! - [`ast`]: AST node definitions
//!
//! # Supported subset
//!
//! - One class containing methods; access and `static`/`final` modifiers are ignored
//! - Types: `int`/`long` (both 64-bit), `boolean`, `String`, `void`, arrays of those
//! - Statements: declarations, expression statements, `if`/`else`, `while`, `for`, `return`, blocks
//! - Expressions: arithmetic, comparison, `!`, increments, compound assignment,
//!   array indexing and creation, `.length`, method calls (optionally qualified)
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{parse_source, ParseError, Parser};
