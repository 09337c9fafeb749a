// Constants for the interpreter

/// Method invoked when an analysis starts
pub const DEFAULT_ENTRY_METHOD: &str = "main";

/// Units of work (statement dispatches plus method invocations) allowed per analysis
pub const DEFAULT_STEP_CEILING: usize = 2000;

/// Maximum simultaneously active invocations of any single method
pub const DEFAULT_RECURSION_CEILING: usize = 8;

/// Maximum frames on the call stack at once, across all methods
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100;

/// Array elements a single analysis may allocate in total
pub const DEFAULT_MAX_ARRAY_ELEMENTS: usize = 1_000_000;

/// Rendered Step text a trace may hold, in bytes
pub const DEFAULT_MAX_SNAPSHOT_BYTES: usize = 64 * 1024 * 1024;

/// Joins frame names in a Step's call-stack label, bottom first
pub const CALL_STACK_SEPARATOR: &str = " -> ";

pub const BUILTIN_PRINT: &str = "print";
pub const BUILTIN_PRINTLN: &str = "println";

/// The only field readable through `.`: an array's element count
pub const LENGTH_FIELD: &str = "length";
