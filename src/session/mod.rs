//! Analysis session: source text in, [`AnalysisResult`] out.
//!
//! This is the only place failures are caught. Parse errors, program-model
//! errors and runtime errors all become a terminal `Error: ...` Step plus
//! `success = false`; nothing escapes as a panic or an `Err`.

use crate::analysis::Complexity;
use crate::interpreter::cancel::CancellationToken;
use crate::interpreter::config::AnalyzerConfig;
use crate::interpreter::engine::{Interpreter, RunArtifacts};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::recursion::CallRecord;
use crate::memory::stack::CallStack;
use crate::parser::{parse_source, ParseError};
use crate::program::{Program, ProgramError};
use crate::snapshot::Step;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Any failure an analysis can end with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl AnalysisError {
    /// Source line the failure points at, 0 when there is none
    pub fn line(&self) -> usize {
        match self {
            AnalysisError::Parse(err) => err.location.line,
            AnalysisError::Program(_) => 0,
            AnalysisError::Runtime(err) => err.location().line,
        }
    }
}

/// Everything one analysis produces
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub trace: Vec<Step>,
    pub output: String,
    pub success: bool,
    pub error_message: Option<String>,
    /// Units of work consumed; equals the step ceiling when the ceiling stopped the run
    pub steps_executed: usize,
    pub calls: Vec<CallRecord>,
    /// `None` when the source did not parse
    pub complexity: Option<Complexity>,
}

impl AnalysisResult {
    /// The final Step, usually the one a client shows first
    pub fn last_step(&self) -> Option<&Step> {
        self.trace.last()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
    cancel: CancellationToken,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Analyzer {
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Token that stops analyses started by this analyzer
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Parse, build and run `source`, always returning a well-formed result
    pub fn analyze(&self, source: &str) -> AnalysisResult {
        let unit = match parse_source(source) {
            Ok(unit) => unit,
            Err(err) => return self.failed_before_run(err.into(), None),
        };

        let complexity = Complexity::estimate(&unit);
        debug!(time = %complexity.time, space = %complexity.space, "complexity estimated");

        let program = match Program::build(unit, &self.config.entry_method) {
            Ok(program) => program,
            Err(err) => return self.failed_before_run(err.into(), Some(complexity)),
        };

        let mut interpreter =
            Interpreter::new(program, self.config.clone()).with_cancellation(self.cancel.clone());
        let outcome = interpreter.run();
        let RunArtifacts {
            mut trace,
            output,
            calls,
            steps_executed,
            stack,
        } = interpreter.finish();

        let error_message = match outcome {
            Ok(_) => None,
            Err(err) => {
                let err = AnalysisError::from(err);
                trace.push(self.diagnostic_step(&err, &stack));
                Some(err.to_string())
            }
        };

        let result = AnalysisResult {
            trace: trace.into_steps(),
            output: output.into_string(),
            success: error_message.is_none(),
            error_message,
            steps_executed,
            calls,
            complexity: Some(complexity),
        };
        info!(
            success = result.success,
            steps = result.trace.len(),
            work = result.steps_executed,
            "analysis finished"
        );
        result
    }

    fn failed_before_run(&self, err: AnalysisError, complexity: Option<Complexity>) -> AnalysisResult {
        info!(error = %err, "analysis failed before execution");
        AnalysisResult {
            trace: vec![self.diagnostic_step(&err, &CallStack::new())],
            output: String::new(),
            success: false,
            error_message: Some(err.to_string()),
            steps_executed: 0,
            calls: Vec::new(),
            complexity,
        }
    }

    /// Terminal Step showing the frame that failed, if any
    fn diagnostic_step(&self, err: &AnalysisError, stack: &CallStack) -> Step {
        Step::capture(
            err.line(),
            format!("Error: {}", err),
            stack,
            &self.config.stack_separator,
        )
    }
}

/// Analyze `source` with the default configuration
pub fn analyze(source: &str) -> AnalysisResult {
    Analyzer::default().analyze(source)
}
