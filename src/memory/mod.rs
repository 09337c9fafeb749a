//! Memory model for the interpreter
//!
//! - [`value`]: Runtime value representation (Int, Bool, Text, Array, Unit)
//! - [`stack`]: Call stack with frames and their flat binding tables

pub mod stack;
pub mod value;
