use crate::interpreter::cancel::CancellationToken;
use crate::interpreter::config::{AnalyzerConfig, RecursionPolicy};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::parse_source;
use crate::program::Program;
use pretty_assertions::assert_eq;

fn interpreter(source: &str, config: AnalyzerConfig) -> Interpreter {
    let unit = parse_source(source).expect("Parsing failed");
    let program = Program::build(unit, &config.entry_method).expect("Program build failed");
    Interpreter::new(program, config)
}

fn run(source: &str) -> (Interpreter, Result<Value, RuntimeError>) {
    let mut interp = interpreter(source, AnalyzerConfig::default());
    let result = interp.run();
    (interp, result)
}

const FACTORIAL: &str = r#"
class Main {
    static int fact(int n) {
        if (n <= 1) return 1;
        return n * fact(n - 1);
    }
    static void main() {
        int r = fact(5);
    }
}
"#;

#[test]
fn test_one_step_per_statement() {
    let (interp, result) = run(
        "class Main { static void main() { int x = 5; int y = 10; int sum = x + y; } }",
    );
    assert_eq!(result, Ok(Value::Unit));
    assert_eq!(interp.steps_executed(), 4);

    let steps = interp.trace().steps();
    let descriptions: Vec<&str> = steps.iter().map(|s| s.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec![
            "Entering main",
            "Executed: int x = 5",
            "Executed: int y = 10",
            "Executed: int sum = x + y",
        ]
    );

    let last = &steps[3];
    assert_eq!(last.variables.names().collect::<Vec<_>>(), vec!["x", "y", "sum"]);
    assert_eq!(last.variables.value_of("sum"), Some("15"));
    assert_eq!(last.call_stack, "main");
    assert!(interp.stack().is_empty());
}

#[test]
fn test_call_costs_one_unit_and_records_entry() {
    let source = r#"
        class Main {
            static int add(int a, int b) { return a + b; }
            static void main() { int r = add(2, 3); }
        }
    "#;
    let (interp, result) = run(source);
    assert!(result.is_ok());
    // entry, declaration, call, return
    assert_eq!(interp.steps_executed(), 4);

    let steps = interp.trace().steps();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[1].description, "Entering add");
    assert_eq!(steps[1].call_stack, "main -> add");
    assert_eq!(steps[2].description, "Return statement");
    assert_eq!(steps[2].variables.value_of("a"), Some("2"));
    assert_eq!(steps[2].variables.value_of("b"), Some("3"));
    assert_eq!(steps[3].description, "Executed: int r = add(2, 3)");
    assert_eq!(steps[3].variables.value_of("r"), Some("5"));
    assert_eq!(steps[3].call_stack, "main");
}

#[test]
fn test_step_ceiling_is_exact() {
    let config = AnalyzerConfig::default().with_step_ceiling(10);
    let mut interp = interpreter("class Main { static void main() { while (true) { } } }", config);

    let result = interp.run();
    assert!(matches!(
        result,
        Err(RuntimeError::ExecutionLimitExceeded { limit: 10, .. })
    ));
    assert_eq!(interp.steps_executed(), 10);
    assert_eq!(interp.trace().len(), 1);
}

#[test]
fn test_ceiling_of_one_stops_at_first_statement() {
    let config = AnalyzerConfig::default().with_step_ceiling(1);
    let mut interp = interpreter("class Main { static void main() { int x = 1; } }", config);

    assert!(interp.run().is_err());
    assert_eq!(interp.steps_executed(), 1);
    assert_eq!(interp.trace().last().map(|s| s.description.as_str()), Some("Entering main"));
}

#[test]
fn test_failing_frame_stays_on_stack() {
    let (interp, result) = run("class Main { static void main() { int a = 1; int b = a / 0; } }");

    assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
    assert_eq!(interp.stack().depth(), 1);
    let frame = interp.stack().current_frame().expect("frame");
    assert_eq!(frame.get("a"), Some(&Value::Int(1)));
    assert!(!frame.is_bound("b"));
}

#[test]
fn test_recursion_within_ceiling() {
    let (interp, result) = run(FACTORIAL);
    assert!(result.is_ok());
    let last = interp.trace().last().expect("steps");
    assert_eq!(last.variables.value_of("r"), Some("120"));
}

#[test]
fn test_recursion_ceiling_substitutes_type_default() {
    let config = AnalyzerConfig::default()
        .with_recursion_ceiling(2)
        .with_recursion_policy(RecursionPolicy::TypeDefault);
    let mut interp = interpreter(FACTORIAL, config);

    assert!(interp.run().is_ok());
    let last = interp.trace().last().expect("steps");
    assert_eq!(last.variables.value_of("r"), Some("0"));

    let calls = interp.finish().calls;
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].args, vec!["5".to_string()]);
    assert_eq!(calls[0].return_value.as_deref(), Some("0"));
    assert_eq!(calls[2].depth, 3);
    assert_eq!(calls[2].args, vec!["3".to_string()]);
    assert!(calls[2].substituted);
}

#[test]
fn test_recursion_ceiling_fails_under_fail_policy() {
    let config = AnalyzerConfig::default()
        .with_recursion_ceiling(2)
        .with_recursion_policy(RecursionPolicy::Fail);
    let mut interp = interpreter(FACTORIAL, config);

    match interp.run() {
        Err(RuntimeError::RecursionLimitExceeded { method, depth, .. }) => {
            assert_eq!(method, "fact");
            assert_eq!(depth, 2);
        }
        other => panic!("expected RecursionLimitExceeded, got {:?}", other),
    }
    // main and two active fact frames
    assert_eq!(interp.stack().depth(), 3);
}

#[test]
fn test_entry_parameters_stay_unbound() {
    let (interp, result) =
        run("class Main { public static void main(String[] args) { int x = 1; } }");
    assert!(result.is_ok());
    let last = interp.trace().last().expect("steps");
    assert_eq!(last.variables.names().collect::<Vec<_>>(), vec!["x"]);
}

#[test]
fn test_arrays_are_shared_references() {
    let source = r#"
        class Main {
            static void fill(int[] arr) { arr[0] = 7; }
            static void main() {
                int[] a = {1, 2};
                int[] b = a;
                b[1] = 9;
                int[] data = new int[3];
                fill(data);
            }
        }
    "#;
    let (interp, result) = run(source);
    assert!(result.is_ok());
    let last = interp.trace().last().expect("steps");
    assert_eq!(last.variables.value_of("a"), Some("1, 9"));
    assert_eq!(last.variables.value_of("data"), Some("7, 0, 0"));
}

#[test]
fn test_increment_and_compound_assignment() {
    let source = r#"
        class Main {
            static void main() {
                int i = 5;
                int j = i++;
                int k = ++i;
                k -= 2;
                k *= 3;
            }
        }
    "#;
    let (interp, result) = run(source);
    assert!(result.is_ok());
    let last = interp.trace().last().expect("steps");
    assert_eq!(last.variables.value_of("i"), Some("7"));
    assert_eq!(last.variables.value_of("j"), Some("5"));
    assert_eq!(last.variables.value_of("k"), Some("15"));
    assert_eq!(last.description, "Executed: k *= 3");
}

#[test]
fn test_if_records_condition_before_branch() {
    let source = r#"
        class Main {
            static void main() {
                int x = 3;
                if (x > 2) x = 0; else x = 1;
            }
        }
    "#;
    let (interp, _) = run(source);
    let descriptions: Vec<&str> = interp
        .trace()
        .steps()
        .iter()
        .map(|s| s.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "Entering main",
            "Executed: int x = 3",
            "Checking condition: x > 2",
            "Executed: x = 0",
        ]
    );
}

#[test]
fn test_builtins_write_output_without_work() {
    let source = r#"
        class Main {
            static void main() {
                System.out.println(1 + 2);
                System.out.print("a");
                print(true);
            }
        }
    "#;
    let (interp, result) = run(source);
    assert!(result.is_ok());
    // entry plus three statements; builtins are free
    assert_eq!(interp.steps_executed(), 4);
    assert_eq!(interp.finish().output.contents(), "3\natrue");
}

#[test]
fn test_condition_must_be_boolean() {
    let (_, result) = run("class Main { static void main() { int x = 1; while (x) { } } }");
    assert!(matches!(result, Err(RuntimeError::TypeError { .. })));
}

#[test]
fn test_undefined_names_fail() {
    let (_, result) = run("class Main { static void main() { foo(); } }");
    assert!(matches!(result, Err(RuntimeError::UndefinedMethod { name, .. }) if name == "foo"));

    let (_, result) = run("class Main { static void main() { int x = y + 1; } }");
    assert!(matches!(result, Err(RuntimeError::UndefinedVariable { name, .. }) if name == "y"));
}

#[test]
fn test_argument_count_mismatch() {
    let source = r#"
        class Main {
            static int add(int a, int b) { return a + b; }
            static void main() { int r = add(1); }
        }
    "#;
    let (_, result) = run(source);
    assert!(matches!(
        result,
        Err(RuntimeError::ArgumentCountMismatch { expected: 2, got: 1, .. })
    ));
}

#[test]
fn test_index_out_of_range() {
    let (_, result) = run("class Main { static void main() { int[] a = new int[5]; int x = a[10]; } }");
    assert!(matches!(
        result,
        Err(RuntimeError::IndexOutOfRange { index: 10, length: 5, .. })
    ));
}

#[test]
fn test_cancelled_before_start() {
    let token = CancellationToken::new();
    token.cancel();
    let mut interp = interpreter(
        "class Main { static void main() { int x = 1; } }",
        AnalyzerConfig::default(),
    )
    .with_cancellation(token);

    assert!(matches!(interp.run(), Err(RuntimeError::Cancelled { .. })));
    assert_eq!(interp.steps_executed(), 0);
    assert!(interp.trace().is_empty());
}

fn call_chain(length: usize) -> String {
    let mut source = String::from("class Main {\n");
    for i in 0..length {
        source.push_str(&format!("    static void m{}() {{ m{}(); }}\n", i, i + 1));
    }
    source.push_str(&format!("    static void m{}() {{ }}\n", length));
    source.push_str("    static void main() { m0(); }\n}\n");
    source
}

#[test]
fn test_call_depth_counts_every_method() {
    let config = AnalyzerConfig::default().with_max_call_depth(20);
    let mut within = interpreter(&call_chain(10), config.clone());
    assert!(within.run().is_ok());

    let mut interp = interpreter(&call_chain(40), config);
    match interp.run() {
        Err(RuntimeError::CallDepthExceeded { method, limit, .. }) => {
            assert_eq!(method, "m19");
            assert_eq!(limit, 20);
        }
        other => panic!("expected CallDepthExceeded, got {:?}", other),
    }
    assert_eq!(interp.stack().depth(), 20);
}

#[test]
fn test_huge_array_is_refused_before_allocation() {
    let (interp, result) = run("class Main { static void main() { int[] a = new int[1000000000000]; } }");
    assert!(matches!(
        result,
        Err(RuntimeError::OutOfMemory { requested: 1_000_000_000_000, limit: 1_000_000, .. })
    ));
    assert_eq!(interp.stack().depth(), 1);
}

#[test]
fn test_allocation_budget_is_cumulative() {
    let source = r#"
        class Main {
            static void main() {
                int[] a = {1, 2, 3};
                int[] b = new int[2];
                int[] c = {4};
            }
        }
    "#;
    let config = AnalyzerConfig::default().with_max_array_elements(5);
    let mut interp = interpreter(source, config);

    assert!(matches!(
        interp.run(),
        Err(RuntimeError::OutOfMemory { requested: 1, limit: 5, .. })
    ));
    let last = interp.trace().last().expect("steps");
    assert_eq!(last.variables.value_of("b"), Some("0, 0"));
}

#[test]
fn test_snapshot_budget() {
    let source = r#"
        class Main {
            static void main() {
                int[] data = new int[50];
                int i = 0;
                while (true) { i++; }
            }
        }
    "#;
    let config = AnalyzerConfig::default().with_max_snapshot_bytes(1000);
    let mut interp = interpreter(source, config);

    assert!(matches!(
        interp.run(),
        Err(RuntimeError::SnapshotLimitExceeded { limit: 1000, .. })
    ));
    assert!(interp.trace().bytes() > 1000);
    assert!(interp.steps_executed() < 2000);
}
