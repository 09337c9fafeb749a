//! Recursion governor.
//!
//! Tracks how many invocations of each method are active and refuses new ones
//! once a method reaches the ceiling. It also keeps the call log: one
//! [`CallRecord`] per invocation attempt, in invocation order.

use crate::memory::value::Value;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

/// One invocation as seen by the governor; values are rendered when recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub method: String,
    pub depth: usize,
    pub args: Vec<String>,
    /// `None` while the invocation is still running or when the run aborted inside it
    pub return_value: Option<String>,
    /// The body never ran; the return value came from the recursion fallback
    pub substituted: bool,
}

#[derive(Debug, Clone)]
pub struct RecursionGovernor {
    ceiling: usize,
    active: FxHashMap<String, usize>,
    calls: Vec<CallRecord>,
    /// Indices into `calls` of invocations that have not returned yet
    open: Vec<usize>,
}

fn render_args(args: &[Value]) -> Vec<String> {
    args.iter().map(Value::to_string).collect()
}

impl RecursionGovernor {
    pub fn new(ceiling: usize) -> Self {
        RecursionGovernor {
            ceiling,
            active: FxHashMap::default(),
            calls: Vec::new(),
            open: Vec::new(),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Active invocations of `method`
    pub fn depth(&self, method: &str) -> usize {
        self.active.get(method).copied().unwrap_or(0)
    }

    pub fn can_enter(&self, method: &str) -> bool {
        self.depth(method) < self.ceiling
    }

    /// Register a new invocation and return its 1-based depth for frame tagging
    pub fn enter(&mut self, method: &str, args: &[Value]) -> usize {
        let depth = self.depth(method) + 1;
        self.active.insert(method.to_string(), depth);

        self.open.push(self.calls.len());
        self.calls.push(CallRecord {
            method: method.to_string(),
            depth,
            args: render_args(args),
            return_value: None,
            substituted: false,
        });
        depth
    }

    /// Close the most recent open invocation of `method`
    pub fn leave(&mut self, method: &str, return_value: &Value) {
        if let Some(count) = self.active.get_mut(method) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.active.remove(method);
            }
        }

        if let Some(index) = self.open.pop() {
            if let Some(record) = self.calls.get_mut(index) {
                record.return_value = Some(return_value.to_string());
            }
        }
    }

    /// Log an invocation refused at the ceiling and answered with `fallback`
    pub fn substitute(&mut self, method: &str, args: &[Value], fallback: &Value) {
        debug!(
            method,
            ceiling = self.ceiling,
            fallback = %fallback,
            "recursion ceiling reached, substituting fallback"
        );
        self.calls.push(CallRecord {
            method: method.to_string(),
            depth: self.depth(method) + 1,
            args: render_args(args),
            return_value: Some(fallback.to_string()),
            substituted: true,
        });
    }

    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<CallRecord> {
        self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ceiling_gates_entry() {
        let mut governor = RecursionGovernor::new(2);
        assert!(governor.can_enter("f"));
        assert_eq!(governor.enter("f", &[Value::Int(3)]), 1);
        assert_eq!(governor.enter("f", &[Value::Int(2)]), 2);
        assert!(!governor.can_enter("f"));
        assert!(governor.can_enter("g"));

        governor.leave("f", &Value::Int(1));
        assert!(governor.can_enter("f"));
        assert_eq!(governor.depth("f"), 1);
    }

    #[test]
    fn test_call_log_matches_invocations() {
        let mut governor = RecursionGovernor::new(8);
        governor.enter("fact", &[Value::Int(2)]);
        governor.enter("fact", &[Value::Int(1)]);
        governor.leave("fact", &Value::Int(1));
        governor.leave("fact", &Value::Int(2));

        let summary: Vec<(usize, Option<&str>)> = governor
            .calls()
            .iter()
            .map(|c| (c.depth, c.return_value.as_deref()))
            .collect();
        assert_eq!(summary, vec![(1, Some("2")), (2, Some("1"))]);
        assert_eq!(governor.depth("fact"), 0);
    }

    #[test]
    fn test_substitution_is_logged() {
        let mut governor = RecursionGovernor::new(1);
        governor.enter("f", &[]);
        governor.substitute("f", &[Value::Int(4)], &Value::Int(0));

        let record = &governor.calls()[1];
        assert!(record.substituted);
        assert_eq!(record.depth, 2);
        assert_eq!(record.args, vec!["4".to_string()]);
        assert_eq!(record.return_value.as_deref(), Some("0"));
    }
}
