// tracewalk: step-by-step execution traces for small Java-like programs

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use tracewalk::{Analyzer, AnalyzerConfig, RecursionPolicy};

/// Run a program and print its execution trace as JSON
#[derive(Parser, Debug)]
#[command(name = "tracewalk", version)]
#[command(about = "Trace the execution of a small Java-like program", long_about = None)]
struct Args {
    /// Source file to analyze
    file: PathBuf,

    /// JSON file with analyzer settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum units of work (statements plus method calls)
    #[arg(long)]
    max_steps: Option<usize>,

    /// Maximum simultaneously active invocations of one method
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum frames on the call stack at once, across all methods
    #[arg(long)]
    max_call_depth: Option<usize>,

    /// Maximum array elements allocated over the whole run
    #[arg(long)]
    max_array_elements: Option<usize>,

    /// What to do when a method hits the depth ceiling: type-default or fail
    #[arg(long)]
    recursion_policy: Option<RecursionPolicy>,

    /// Method to start from
    #[arg(long)]
    entry: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn analyzer_config(&self) -> Result<AnalyzerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => AnalyzerConfig::default(),
        };

        if let Some(steps) = self.max_steps {
            config = config.with_step_ceiling(steps);
        }
        if let Some(depth) = self.max_depth {
            config = config.with_recursion_ceiling(depth);
        }
        if let Some(depth) = self.max_call_depth {
            config = config.with_max_call_depth(depth);
        }
        if let Some(elements) = self.max_array_elements {
            config = config.with_max_array_elements(elements);
        }
        if let Some(policy) = self.recursion_policy {
            config = config.with_recursion_policy(policy);
        }
        if let Some(entry) = &self.entry {
            config = config.with_entry_method(entry.clone());
        }
        Ok(config)
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG controls the level, warnings only by default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let source = fs::read_to_string(&args.file)
        .map_err(|e| format!("cannot read '{}': {}", args.file.display(), e))?;
    let config = args.analyzer_config()?;
    debug!(?config, "starting analysis");

    let result = Analyzer::new(config).analyze(&source);

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
