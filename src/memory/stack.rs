//! Call stack implementation
//!
//! - [`Frame`]: one method invocation's activation record
//! - [`CallStack`]: LIFO sequence of frames
//!
//! # Scoping
//!
//! A frame holds a single flat binding table. Blocks do not open scopes, and
//! only the top frame is consulted when a name is read or written; enclosing
//! frames are never searched.

use super::value::Value;
use rustc_hash::FxHashMap;

/// Stack frame for a method invocation
#[derive(Debug, Clone)]
pub struct Frame {
    pub method_name: String,
    /// 1-based recursion depth of this method when the frame was pushed
    pub depth: usize,
    locals: FxHashMap<String, Value>,
    insertion_order: Vec<String>,
}

impl Frame {
    pub fn new(method_name: impl Into<String>, depth: usize) -> Self {
        Frame {
            method_name: method_name.into(),
            depth,
            locals: FxHashMap::default(),
            insertion_order: Vec::new(),
        }
    }

    /// Bind `name`, replacing any earlier binding while keeping its original position
    pub fn declare(&mut self, name: &str, value: Value) {
        if self.locals.insert(name.to_string(), value).is_none() {
            self.insertion_order.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.locals.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.locals.get_mut(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.locals.contains_key(name)
    }

    /// Bindings in creation order
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.locals.get(name).map(|value| (name.as_str(), value)))
    }

    pub fn len(&self) -> usize {
        self.insertion_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insertion_order.is_empty()
    }
}

/// The call stack
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack { frames: Vec::new() }
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn current_frame_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// All frames, bottom (entry method) first
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Method names bottom-to-top joined by `separator`, e.g. `main -> fact -> fact`
    pub fn label(&self, separator: &str) -> String {
        self.frames
            .iter()
            .map(|frame| frame.method_name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_keeps_creation_order() {
        let mut frame = Frame::new("main", 1);
        frame.declare("x", Value::Int(5));
        frame.declare("y", Value::Int(10));
        frame.declare("x", Value::Int(7));

        let names: Vec<&str> = frame.bindings().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(frame.get("x"), Some(&Value::Int(7)));
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut frame = Frame::new("main", 1);
        frame.declare("n", Value::Int(1));
        if let Some(value) = frame.get_mut("n") {
            *value = Value::Int(2);
        }
        assert_eq!(frame.get("n"), Some(&Value::Int(2)));
        assert!(!frame.is_bound("m"));
    }

    #[test]
    fn test_label_bottom_to_top() {
        let mut stack = CallStack::new();
        assert_eq!(stack.label(" -> "), "");

        stack.push_frame(Frame::new("main", 1));
        stack.push_frame(Frame::new("fact", 1));
        stack.push_frame(Frame::new("fact", 2));
        assert_eq!(stack.label(" -> "), "main -> fact -> fact");
        assert_eq!(stack.depth(), 3);

        let top = stack.pop_frame().map(|f| f.depth);
        assert_eq!(top, Some(2));
        assert_eq!(stack.current_frame().map(|f| f.depth), Some(1));
    }
}
