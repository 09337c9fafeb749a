// Execution engine for the interpreter

use crate::interpreter::cancel::CancellationToken;
use crate::interpreter::config::AnalyzerConfig;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::recursion::{CallRecord, RecursionGovernor};
use crate::memory::stack::{CallStack, Frame};
use crate::memory::value::Value;
use crate::parser::ast::{Method, SourceLocation, Statement};
use crate::program::Program;
use crate::snapshot::{OutputSink, Trace};
use std::rc::Rc;
use tracing::{debug, warn};

/// How a statement finished
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlFlow {
    Normal,
    /// A `return` unwinds to the calling frame carrying this value
    Return(Value),
}

/// Everything a finished (or aborted) run leaves behind
#[derive(Debug)]
pub struct RunArtifacts {
    pub trace: Trace,
    pub output: OutputSink,
    pub calls: Vec<CallRecord>,
    pub steps_executed: usize,
    /// Frames still active when the run stopped; empty after a normal finish
    pub stack: CallStack,
}

/// Tree-walking interpreter that records a Step at every recording point
pub struct Interpreter {
    program: Rc<Program>,
    pub(crate) config: AnalyzerConfig,
    pub(crate) stack: CallStack,
    pub(crate) trace: Trace,
    pub(crate) output: OutputSink,
    pub(crate) governor: RecursionGovernor,
    cancel: CancellationToken,
    /// Units of work consumed so far
    work_done: usize,
    /// Array elements allocated so far
    allocated: usize,
}

impl Interpreter {
    pub fn new(program: Program, config: AnalyzerConfig) -> Self {
        let governor = RecursionGovernor::new(config.recursion_ceiling);
        Interpreter {
            program: Rc::new(program),
            config,
            stack: CallStack::new(),
            trace: Trace::new(),
            output: OutputSink::new(),
            governor,
            cancel: CancellationToken::new(),
            work_done: 0,
            allocated: 0,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run the entry method to completion and return its result.
    ///
    /// The entry method gets no arguments; its declared parameters stay unbound.
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        let program = Rc::clone(&self.program);
        let entry = program.entry().ok_or_else(|| RuntimeError::UndefinedMethod {
            name: program.entry_name().to_string(),
            location: SourceLocation::default(),
        })?;

        self.tick(entry.location)?;
        let result = self.activate(entry, Vec::new())?;
        debug!(steps = self.work_done, "entry method returned");
        Ok(result)
    }

    /// Consume the interpreter, keeping the trace, output and call log
    pub fn finish(self) -> RunArtifacts {
        RunArtifacts {
            trace: self.trace,
            output: self.output,
            calls: self.governor.into_calls(),
            steps_executed: self.work_done,
            stack: self.stack,
        }
    }

    pub fn steps_executed(&self) -> usize {
        self.work_done
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub(crate) fn program(&self) -> Rc<Program> {
        Rc::clone(&self.program)
    }

    /// Consume one unit of work.
    ///
    /// With a ceiling of N, exactly N units succeed and unit N+1 fails.
    pub(crate) fn tick(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        if self.cancel.is_cancelled() {
            warn!(line = location.line, "analysis cancelled");
            return Err(RuntimeError::Cancelled { location });
        }
        if self.work_done >= self.config.step_ceiling {
            warn!(
                limit = self.config.step_ceiling,
                line = location.line,
                "step ceiling reached, aborting run"
            );
            return Err(RuntimeError::ExecutionLimitExceeded {
                limit: self.config.step_ceiling,
                location,
            });
        }
        self.work_done += 1;
        Ok(())
    }

    /// Charge `elements` new array slots against the allocation budget
    pub(crate) fn allocate(&mut self, elements: usize, location: SourceLocation) -> Result<(), RuntimeError> {
        let limit = self.config.max_array_elements;
        match self.allocated.checked_add(elements) {
            Some(total) if total <= limit => {
                self.allocated = total;
                Ok(())
            }
            _ => {
                warn!(requested = elements, allocated = self.allocated, limit, "allocation limit reached");
                Err(RuntimeError::OutOfMemory {
                    requested: elements,
                    limit,
                    location,
                })
            }
        }
    }

    /// Append a Step for the current top frame
    pub(crate) fn record(&mut self, line: usize, description: impl Into<String>) -> Result<(), RuntimeError> {
        self.trace
            .record(line, description, &self.stack, &self.config.stack_separator);

        let current = self.trace.bytes();
        if current > self.config.max_snapshot_bytes {
            warn!(current, limit = self.config.max_snapshot_bytes, "snapshot limit reached");
            return Err(RuntimeError::SnapshotLimitExceeded {
                current,
                limit: self.config.max_snapshot_bytes,
                location: SourceLocation::new(line, 0),
            });
        }
        Ok(())
    }

    /// Push a frame for `method`, bind `args` to its parameters in order,
    /// run the body and pop the frame.
    ///
    /// On error the frame is left on the stack so the diagnostic Step can show it.
    pub(crate) fn activate(&mut self, method: &Method, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let depth = self.governor.enter(&method.name, &args);
        debug!(method = %method.name, depth, "entering method");

        let mut frame = Frame::new(method.name.clone(), depth);
        for (param, arg) in method.params.iter().zip(args) {
            frame.declare(&param.name, arg);
        }
        self.stack.push_frame(frame);
        self.record(method.line(), format!("Entering {}", method.name))?;

        let result = self.execute_body(&method.body)?;

        self.stack.pop_frame();
        self.governor.leave(&method.name, &result);
        debug!(method = %method.name, depth, result = %result, "leaving method");
        Ok(result)
    }

    /// Run a method body; falling off the end yields Unit
    fn execute_body(&mut self, body: &[Statement]) -> Result<Value, RuntimeError> {
        for stmt in body {
            if let ControlFlow::Return(value) = self.execute_statement(stmt)? {
                return Ok(value);
            }
        }
        Ok(Value::Unit)
    }

    pub(crate) fn current_frame_mut(&mut self, location: SourceLocation) -> Result<&mut Frame, RuntimeError> {
        self.stack
            .current_frame_mut()
            .ok_or(RuntimeError::NoStackFrame { location })
    }

    pub(crate) fn current_frame(&self, location: SourceLocation) -> Result<&Frame, RuntimeError> {
        self.stack
            .current_frame()
            .ok_or(RuntimeError::NoStackFrame { location })
    }
}
