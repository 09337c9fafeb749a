pub mod assign;
pub mod binary;
pub mod unary;

// Everything here extends `Interpreter` through `impl` blocks
