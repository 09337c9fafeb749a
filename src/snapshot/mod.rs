// Step recording and output capture

use crate::memory::stack::CallStack;
use crate::memory::value::Value;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Captures text written by `print`/`println`
#[derive(Debug, Clone, Default)]
pub struct OutputSink {
    buffer: String,
}

impl OutputSink {
    pub fn new() -> Self {
        OutputSink {
            buffer: String::new(),
        }
    }

    /// Print without newline
    pub fn print(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn println(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

/// Rendering hint telling a client which widget draws a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetHint {
    Variable,
    String,
    Array,
}

impl WidgetHint {
    pub fn for_value(value: &Value) -> Self {
        match value {
            Value::Array(_) => WidgetHint::Array,
            Value::Text(_) => WidgetHint::String,
            Value::Int(_) | Value::Bool(_) | Value::Unit => WidgetHint::Variable,
        }
    }
}

/// One binding as it looked when a Step was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableState {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: String,
    pub widget_hint: WidgetHint,
}

impl VariableState {
    pub fn capture(value: &Value) -> Self {
        VariableState {
            type_tag: value.type_tag().to_string(),
            value: value.render(),
            widget_hint: WidgetHint::for_value(value),
        }
    }
}

/// Bindings of the top frame, in creation order.
///
/// Serialized as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(Vec<(String, VariableState)>);

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&VariableState> {
        self.0
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, state)| state)
    }

    /// Rendered value of `name`, the common lookup in assertions and clients
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|state| state.value.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Bindings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, state) in &self.0 {
            map.serialize_entry(name, state)?;
        }
        map.end()
    }
}

/// Snapshot of execution state at one recording point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub line: usize,
    pub description: String,
    pub variables: Bindings,
    pub call_stack: String,
}

impl Step {
    /// Capture the top frame of `stack`; an empty stack yields no bindings
    pub fn capture(line: usize, description: String, stack: &CallStack, separator: &str) -> Self {
        let variables = stack
            .current_frame()
            .map(|frame| {
                Bindings(
                    frame
                        .bindings()
                        .map(|(name, value)| (name.to_string(), VariableState::capture(value)))
                        .collect(),
                )
            })
            .unwrap_or_default();

        Step {
            line,
            description,
            variables,
            call_stack: stack.label(separator),
        }
    }
}

impl Step {
    /// Approximate heap footprint of the rendered text, in bytes
    pub fn text_size(&self) -> usize {
        let bindings: usize = self
            .variables
            .0
            .iter()
            .map(|(name, state)| name.len() + state.type_tag.len() + state.value.len())
            .sum();
        self.description.len() + self.call_stack.len() + bindings
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.line, self.description, self.call_stack)
    }
}

/// Append-only execution history; index order is execution order
#[derive(Debug, Clone, Default)]
pub struct Trace {
    steps: Vec<Step>,
    /// Sum of [`Step::text_size`] over all steps
    bytes: usize,
}

impl Trace {
    pub fn new() -> Self {
        Trace {
            steps: Vec::new(),
            bytes: 0,
        }
    }

    /// Snapshot the current top frame and append it
    pub fn record(
        &mut self,
        line: usize,
        description: impl Into<String>,
        stack: &CallStack,
        separator: &str,
    ) {
        let step = Step::capture(line, description.into(), stack, separator);
        trace!(index = self.steps.len(), "{}", step);
        self.push(step);
    }

    pub fn push(&mut self, step: Step) {
        self.bytes += step.text_size();
        self.steps.push(step);
    }

    /// Rendered text held by the trace so far
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::stack::Frame;
    use pretty_assertions::assert_eq;

    fn stack_with(bindings: &[(&str, Value)]) -> CallStack {
        let mut frame = Frame::new("main", 1);
        for (name, value) in bindings {
            frame.declare(name, value.clone());
        }
        let mut stack = CallStack::new();
        stack.push_frame(frame);
        stack
    }

    #[test]
    fn test_step_is_independent_of_later_mutation() {
        let arr = Value::array(vec![Value::Int(1), Value::Int(2)]);
        let mut stack = stack_with(&[("a", arr.clone())]);
        let mut trace = Trace::new();

        trace.record(3, "Executed: int[] a = {1, 2}", &stack, " -> ");
        if let Some(items) = arr.as_array() {
            items.borrow_mut()[0] = Value::Int(9);
        }
        if let Some(frame) = stack.current_frame_mut() {
            frame.declare("b", Value::Bool(true));
        }
        trace.record(4, "Executed: a[0] = 9", &stack, " -> ");

        assert_eq!(trace.get(0).and_then(|s| s.variables.value_of("a")), Some("1, 2"));
        assert_eq!(trace.get(0).map(|s| s.variables.len()), Some(1));
        assert_eq!(trace.get(1).and_then(|s| s.variables.value_of("a")), Some("9, 2"));
    }

    #[test]
    fn test_step_json_shape() {
        let stack = stack_with(&[
            ("sum", Value::Int(15)),
            ("name", Value::Text("x".to_string())),
            ("flags", Value::array(vec![Value::Bool(true)])),
        ]);
        let step = Step::capture(7, "Executed: sum = 15".to_string(), &stack, " -> ");

        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"line":7,"description":"Executed: sum = 15","variables":{"#,
                r#""sum":{"type":"int","value":"15","widgetHint":"variable"},"#,
                r#""name":{"type":"String","value":"x","widgetHint":"string"},"#,
                r#""flags":{"type":"ARRAY","value":"true","widgetHint":"array"}},"#,
                r#""callStack":"main"}"#
            )
        );
    }

    #[test]
    fn test_output_sink() {
        let mut out = OutputSink::new();
        out.print("a");
        out.println("b");
        out.print("c");
        assert_eq!(out.contents(), "ab\nc");
    }

    #[test]
    fn test_trace_tracks_rendered_size() {
        let stack = stack_with(&[("ab", Value::Int(123))]);
        let mut trace = Trace::new();
        assert_eq!(trace.bytes(), 0);

        trace.record(1, "Entering main", &stack, " -> ");
        // description 13 + call stack 4 + name 2 + "int" 3 + "123" 3
        assert_eq!(trace.bytes(), 25);
        trace.record(2, "Entering main", &stack, " -> ");
        assert_eq!(trace.bytes(), 50);
    }

    #[test]
    fn test_empty_stack_step() {
        let step = Step::capture(0, "Error: boom".to_string(), &CallStack::new(), " -> ");
        assert!(step.variables.is_empty());
        assert_eq!(step.call_stack, "");
    }
}
