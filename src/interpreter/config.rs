//! Analysis configuration.
//!
//! Every knob has a default from [`constants`](super::constants), so an empty
//! JSON object `{}` deserializes to [`AnalyzerConfig::default`].

use crate::interpreter::constants::{
    CALL_STACK_SEPARATOR, DEFAULT_ENTRY_METHOD, DEFAULT_MAX_ARRAY_ELEMENTS, DEFAULT_MAX_CALL_DEPTH,
    DEFAULT_MAX_SNAPSHOT_BYTES, DEFAULT_RECURSION_CEILING, DEFAULT_STEP_CEILING,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens when a call would push a method past the recursion ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecursionPolicy {
    /// Skip the body and yield the default of the declared return type.
    ///
    /// A heuristic: `factorial(5)` with a ceiling of 2 evaluates to 0, not 120.
    #[default]
    TypeDefault,
    /// Abort the analysis with `RecursionLimitExceeded`
    Fail,
}

impl fmt::Display for RecursionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecursionPolicy::TypeDefault => write!(f, "type-default"),
            RecursionPolicy::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for RecursionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type-default" => Ok(RecursionPolicy::TypeDefault),
            "fail" => Ok(RecursionPolicy::Fail),
            other => Err(format!(
                "unknown recursion policy '{}', expected 'type-default' or 'fail'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    pub entry_method: String,
    pub step_ceiling: usize,
    pub recursion_ceiling: usize,
    pub recursion_policy: RecursionPolicy,
    /// Frames active at once, whichever methods they belong to
    pub max_call_depth: usize,
    /// Total array elements allocated over the run
    pub max_array_elements: usize,
    pub max_snapshot_bytes: usize,
    pub stack_separator: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            entry_method: DEFAULT_ENTRY_METHOD.to_string(),
            step_ceiling: DEFAULT_STEP_CEILING,
            recursion_ceiling: DEFAULT_RECURSION_CEILING,
            recursion_policy: RecursionPolicy::default(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_array_elements: DEFAULT_MAX_ARRAY_ELEMENTS,
            max_snapshot_bytes: DEFAULT_MAX_SNAPSHOT_BYTES,
            stack_separator: CALL_STACK_SEPARATOR.to_string(),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_entry_method(mut self, name: impl Into<String>) -> Self {
        self.entry_method = name.into();
        self
    }

    pub fn with_step_ceiling(mut self, ceiling: usize) -> Self {
        self.step_ceiling = ceiling;
        self
    }

    pub fn with_recursion_ceiling(mut self, ceiling: usize) -> Self {
        self.recursion_ceiling = ceiling;
        self
    }

    pub fn with_recursion_policy(mut self, policy: RecursionPolicy) -> Self {
        self.recursion_policy = policy;
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_array_elements(mut self, elements: usize) -> Self {
        self.max_array_elements = elements;
        self
    }

    pub fn with_max_snapshot_bytes(mut self, bytes: usize) -> Self {
        self.max_snapshot_bytes = bytes;
        self
    }

    pub fn with_stack_separator(mut self, separator: impl Into<String>) -> Self {
        self.stack_separator = separator.into();
        self
    }
}
