// The sample programs under demos/ and their documented output.

use javasim::output::{COMPILE_OK_BANNER, COMPLETION_MARKER, RUNNING_BANNER};
use javasim::{format_source, run_to_completion, validate, QueuedInput, RunConfig, RunStatus};
use std::fs;
use std::path::PathBuf;

fn demo(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "demos", name].iter().collect();
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}

/// Runs a demo and returns the console lines between the banners.
fn run_demo(name: &str, inputs: &[&str]) -> Vec<String> {
    let source = demo(name);
    let mut provider = QueuedInput::new(inputs.iter().map(|s| s.to_string()).collect());
    let result = run_to_completion(&source, name, &RunConfig::default(), &mut provider);

    assert_eq!(result.status, RunStatus::Success, "problems: {:?}", result.problems);
    assert_eq!(result.console_lines[0], COMPILE_OK_BANNER);
    assert_eq!(result.console_lines[1], RUNNING_BANNER);
    assert_eq!(result.console_lines.last().map(String::as_str), Some(COMPLETION_MARKER));

    let lines = &result.console_lines;
    lines[2..lines.len() - 1].to_vec()
}

#[test]
fn every_demo_is_structurally_valid() {
    for name in ["Main.java", "Calculator.java", "UserInput.java", "StarPattern.java"] {
        assert_eq!(validate(&demo(name), name), Vec::new(), "{}", name);
    }
}

#[test]
fn hello_world() {
    assert_eq!(run_demo("Main.java", &[]), vec!["Hello from javasim!"]);
}

#[test]
fn calculator() {
    assert_eq!(run_demo("Calculator.java", &[]), vec!["Sum: 15", "Difference: 5"]);
}

#[test]
fn user_input_echoes_answers() {
    assert_eq!(
        run_demo("UserInput.java", &["Alice", "30"]),
        vec![
            "Enter your name: Alice",
            "Enter your age: 30",
            "",
            "Hello, Alice! You are 30 years old.",
        ]
    );
}

#[test]
fn user_input_cancelled() {
    struct Dismiss;
    impl javasim::InputProvider for Dismiss {
        fn provide(&mut self, _: &javasim::InputRequest) -> javasim::InputReply {
            javasim::InputReply::Cancelled
        }
    }

    let result = run_to_completion(&demo("UserInput.java"), "UserInput.java", &RunConfig::default(), &mut Dismiss);
    assert_eq!(result.status, RunStatus::Cancelled);
    assert!(result.console_lines.is_empty());
    assert!(result.problems.is_empty());
}

#[test]
fn star_pattern() {
    assert_eq!(
        run_demo("StarPattern.java", &[]),
        vec!["* ", "* * ", "* * * ", "* * * * ", "* * * * * "]
    );
}

#[test]
fn runs_are_repeatable() {
    assert_eq!(run_demo("UserInput.java", &["Bo", "7"]), run_demo("UserInput.java", &["Bo", "7"]));
}

#[test]
fn demos_are_already_formatted() {
    for name in ["Main.java", "Calculator.java", "StarPattern.java"] {
        let source = demo(name);
        assert_eq!(format_source(&source), source, "{}", name);
    }
}
