// Table-driven integration tests for javasim
//
// Each suite runs its cases through one pipeline stage (structural
// validation, translation plus parsing, or a whole run) and checks the
// outcome without letting a panic escape the harness.

use javasim::extract::extract_entry_body;
use javasim::output::{COMPILE_OK_BANNER, COMPLETION_MARKER, RUNNING_BANNER};
use javasim::runner::parse_translated;
use javasim::validate::MISSING_ENTRY_POINT;
use javasim::{run_to_completion, translate, validate, QueuedInput, RunConfig, RunStatus};

/// Test result for a single test case
#[derive(Debug)]
pub enum TestResult {
    Pass,
    Fail(String),
    Crash(String),
}

/// Which part of the pipeline a case exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Structural checks only; `input` is a whole source file.
    Validate,
    /// Translate `input` as an entry body and parse the result.
    Translate,
    /// Validate, translate and run `input` as a whole source file.
    Run,
}

/// Individual test case
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub stage: Stage,
    pub should_succeed: bool,
    pub expected_error_contains: Option<String>,
    pub expected_output: Vec<String>,
    pub program_input: Vec<String>,
}

/// Test suite containing multiple test cases
#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
        }
    }

    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Run all tests in this suite
    pub fn run(&self) -> TestSuiteResults {
        let mut results = TestSuiteResults::new(&self.name);

        println!("Running test suite: {}", self.name);
        println!("{}", "=".repeat(50));

        for test in &self.tests {
            let result = run_single_test(test);
            results.add_result(&test.name, result);
        }

        results.print_summary();
        results
    }
}

/// Results for a test suite run
#[derive(Debug)]
pub struct TestSuiteResults {
    pub suite_name: String,
    pub results: Vec<(String, TestResult)>,
    pub passed: usize,
    pub failed: usize,
    pub crashed: usize,
}

impl TestSuiteResults {
    pub fn new(suite_name: &str) -> Self {
        Self {
            suite_name: suite_name.to_string(),
            results: Vec::new(),
            passed: 0,
            failed: 0,
            crashed: 0,
        }
    }

    pub fn add_result(&mut self, test_name: &str, result: TestResult) {
        match &result {
            TestResult::Pass => {
                self.passed += 1;
                println!("  ✓ {}", test_name);
            }
            TestResult::Fail(msg) => {
                self.failed += 1;
                println!("  ✗ {}: {}", test_name, msg);
            }
            TestResult::Crash(msg) => {
                self.crashed += 1;
                println!("  💥 {}: CRASHED - {}", test_name, msg);
            }
        }
        self.results.push((test_name.to_string(), result));
    }

    pub fn print_summary(&self) {
        println!();
        println!("Test Suite: {} - Summary", self.suite_name);
        println!("{}", "-".repeat(30));
        println!("Passed:  {}", self.passed);
        println!("Failed:  {}", self.failed);
        println!("Crashed: {}", self.crashed);
        println!("Total:   {}", self.results.len());

        if self.crashed > 0 {
            println!("\n⚠️  WARNING: {} tests caused crashes!", self.crashed);
        }

        if self.failed > 0 {
            println!("\n❌ {} tests had unexpected results.", self.failed);
        }

        if self.crashed == 0 && self.failed == 0 {
            println!("\n✅ All tests passed!");
        }
        println!();
    }

    pub fn is_all_passed(&self) -> bool {
        self.crashed == 0 && self.failed == 0
    }
}

/// What a stage produced: console lines on success, messages on failure.
type StageOutcome = Result<Vec<String>, Vec<String>>;

/// Run a single test case
fn run_single_test(test: &TestCase) -> TestResult {
    // Catch any panics to detect crashes
    let result = std::panic::catch_unwind(|| run_stage(test));

    match result {
        Ok(outcome) => match (outcome, test.should_succeed) {
            (Ok(console), true) => check_output(test, &console),
            (Ok(_), false) => TestResult::Fail("Expected a failure, but the stage succeeded".to_string()),
            (Err(messages), false) => match &test.expected_error_contains {
                Some(expected) if !messages.iter().any(|m| m.contains(expected.as_str())) => {
                    TestResult::Fail(format!(
                        "Errors {:?} don't contain expected text '{}'",
                        messages, expected
                    ))
                }
                _ => TestResult::Pass,
            },
            (Err(messages), true) => TestResult::Fail(format!("Expected success, but got errors: {:?}", messages)),
        },
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            TestResult::Crash(panic_msg)
        }
    }
}

/// A run's console must be the banners, exactly the expected lines in
/// order, then the completion marker.
fn check_output(test: &TestCase, console: &[String]) -> TestResult {
    if test.stage != Stage::Run {
        return TestResult::Pass;
    }
    let program_output = match console {
        [compiled, running, lines @ .., finished]
            if compiled == COMPILE_OK_BANNER && running == RUNNING_BANNER && finished == COMPLETION_MARKER =>
        {
            lines
        }
        _ => return TestResult::Fail(format!("Console {:?} is not framed by the run banners", console)),
    };
    if program_output == test.expected_output.as_slice() {
        TestResult::Pass
    } else {
        TestResult::Fail(format!(
            "Expected output {:?}, got {:?}",
            test.expected_output, program_output
        ))
    }
}

fn run_stage(test: &TestCase) -> StageOutcome {
    match test.stage {
        Stage::Validate => {
            let issues = validate(&test.input, "Main.java");
            if issues.is_empty() {
                Ok(Vec::new())
            } else {
                Err(issues.iter().map(ToString::to_string).collect())
            }
        }
        Stage::Translate => parse_translated(&translate(&test.input))
            .map(|_| Vec::new())
            .map_err(|error| vec![error.message]),
        Stage::Run => {
            let config = RunConfig::default().with_seed(7);
            let mut provider = QueuedInput::new(test.program_input.clone());
            let result = run_to_completion(&test.input, "Main.java", &config, &mut provider);
            match result.status {
                RunStatus::Success => Ok(result.console_lines),
                _ => Err(result.problems.iter().map(ToString::to_string).collect()),
            }
        }
    }
}

/// Wraps `body` in a `Main` class with an entry method.
fn program(body: &str) -> String {
    format!(
        "public class Main {{\n    public static void main(String[] args) {{\n{}\n    }}\n}}\n",
        body
    )
}

/// Test case builder for convenience
impl TestCase {
    fn base(name: &str, input: &str, stage: Stage, should_succeed: bool) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            stage,
            should_succeed,
            expected_error_contains: None,
            expected_output: Vec::new(),
            program_input: Vec::new(),
        }
    }

    pub fn should_succeed(name: &str, stage: Stage, input: &str) -> Self {
        Self::base(name, input, stage, true)
    }

    pub fn should_fail(name: &str, stage: Stage, input: &str) -> Self {
        Self::base(name, input, stage, false)
    }

    pub fn should_fail_with_message(name: &str, stage: Stage, input: &str, expected_msg: &str) -> Self {
        Self {
            expected_error_contains: Some(expected_msg.to_string()),
            ..Self::base(name, input, stage, false)
        }
    }

    /// A whole run of `body` inside `Main.main` that prints exactly
    /// `expected` between the banners and the completion marker.
    pub fn should_print(name: &str, body: &str, expected: &[&str]) -> Self {
        Self {
            expected_output: expected.iter().map(|line| line.to_string()).collect(),
            ..Self::base(name, &program(body), Stage::Run, true)
        }
    }

    pub fn with_input(mut self, values: &[&str]) -> Self {
        self.program_input = values.iter().map(|value| value.to_string()).collect();
        self
    }
}

// ============================================================================
// Test Suite Creation Functions
// ============================================================================

fn create_structure_tests() -> TestSuite {
    let mut suite = TestSuite::new("Structural Validation");

    suite.add_test(TestCase::should_succeed(
        "minimal_program",
        Stage::Validate,
        &program("        System.out.println(\"hi\");"),
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "missing_entry_method",
        Stage::Validate,
        "public class Main {\n    static void helper() {\n    }\n}\n",
        "Missing entry point",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "class_name_must_match_file",
        Stage::Validate,
        "public class Other {\n    public static void main(String[] args) {\n    }\n}\n",
        "Public class 'Main' must be declared in Main.java.",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "missing_semicolon",
        Stage::Validate,
        &program("        int x = 1"),
        "Error at line 3: Missing semicolon or incomplete statement.",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "extra_closing_brace",
        Stage::Validate,
        "public class Main {\n    public static void main(String[] args) {\n    }\n}\n}\n",
        "Error at line 5: Extra closing brace.",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unclosed_parenthesis",
        Stage::Validate,
        &program("        System.out.println((1 + 2);"),
        "Mismatched parentheses. Unclosed parenthesis from line 3.",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unclosed_brace",
        Stage::Validate,
        "public class Main {\n    public static void main(String[] args) {\n        if (true) {\n    }\n}\n",
        "Mismatched curly braces.",
    ));

    suite
}

fn create_literal_span_tests() -> TestSuite {
    let mut suite = TestSuite::new("Literal Spans");

    suite.add_test(TestCase::should_succeed(
        "braces_inside_string",
        Stage::Validate,
        &program("        System.out.println(\"}}} ((\");"),
    ));

    suite.add_test(TestCase::should_succeed(
        "braces_inside_char",
        Stage::Validate,
        &program("        char c = '}';"),
    ));

    suite.add_test(TestCase::should_succeed(
        "braces_inside_comments",
        Stage::Validate,
        &program("        // }\n        /* { ( */\n        int x = 1;"),
    ));

    suite.add_test(TestCase::should_succeed(
        "escaped_quote_in_string",
        Stage::Validate,
        &program("        System.out.println(\"say \\\"}\\\"\");"),
    ));

    suite
}

fn create_translation_tests() -> TestSuite {
    let mut suite = TestSuite::new("Translation");

    suite.add_test(TestCase::should_succeed("empty_body", Stage::Translate, ""));
    suite.add_test(TestCase::should_succeed(
        "declarations",
        Stage::Translate,
        "int a = 1, b = 2;\ndouble d;\nString s = \"int x = 3;\";",
    ));
    suite.add_test(TestCase::should_succeed(
        "collections",
        Stage::Translate,
        "List<Integer> xs = new ArrayList<>();\nMap<String, Integer> m = new HashMap<>();",
    ));
    suite.add_test(TestCase::should_succeed(
        "loops",
        Stage::Translate,
        "for (int i = 0; i < 3; i++) { }\nfor (String s : names) { }\ndo { x--; } while (x > 0);",
    ));
    suite.add_test(TestCase::should_succeed(
        "casts_and_ternary",
        Stage::Translate,
        "int n = (int) 3.7;\nString s = n > 2 ? \"big\" : \"small\";",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unclosed_group",
        Stage::Translate,
        "int x = (1 + 2;",
        "Expected ')' after expression",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_value",
        Stage::Translate,
        "x = ;",
        "Expected expression, found ';'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "invalid_target",
        Stage::Translate,
        "5 = x;",
        "Invalid assignment target",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "incomplete_ternary",
        Stage::Translate,
        "int y = flag ? 1;",
        "Expected ':' in conditional expression",
    ));

    suite
}

fn create_semantics_tests() -> TestSuite {
    let mut suite = TestSuite::new("Java Semantics");

    suite.add_test(TestCase::should_print(
        "integer_division_truncates",
        "        System.out.println(7 / 2);\n        System.out.println(-7 / 2);\n        System.out.println(7 % 3);",
        &["3", "-3", "1"],
    ));
    suite.add_test(TestCase::should_print(
        "double_arithmetic",
        "        System.out.println(7 / 2.0);\n        System.out.println(1.0 * 3);",
        &["3.5", "3.0"],
    ));
    suite.add_test(TestCase::should_print(
        "concatenation_is_left_to_right",
        "        int a = 1;\n        int b = 2;\n        System.out.println(\"sum \" + a + b);\n        System.out.println(a + b + \" total\");",
        &["sum 12", "3 total"],
    ));
    suite.add_test(TestCase::should_print(
        "char_promotes_in_arithmetic",
        "        char c = 'a';\n        System.out.println(c + 1);\n        System.out.println(\"\" + c);",
        &["98", "a"],
    ));
    suite.add_test(TestCase::should_print(
        "compound_assignment_narrows",
        "        int x = 3;\n        x += 1.5;\n        System.out.println(x);",
        &["4"],
    ));
    suite.add_test(TestCase::should_print(
        "string_equality_by_value",
        "        String a = \"hi\";\n        String b = \"h\" + \"i\";\n        System.out.println(a.equals(b));\n        System.out.println(a == b);",
        &["true", "true"],
    ));
    suite.add_test(TestCase::should_print(
        "casts",
        "        System.out.println((int) 3.9);\n        System.out.println((char) 66);\n        System.out.println((double) 2);",
        &["3", "B", "2.0"],
    ));
    suite.add_test(TestCase::should_print(
        "ternary_and_logic",
        "        int n = 5;\n        System.out.println(n > 3 && n < 10 ? \"inside\" : \"outside\");",
        &["inside"],
    ));
    suite.add_test(TestCase::should_print(
        "exponent_literals",
        "        double x = 1.5e3;\n        System.out.println(x);\n        System.out.println(2.5e-3);\n        System.out.println(1E2 / 4);",
        &["1500.0", "0.0025", "25.0"],
    ));
    suite.add_test(TestCase::should_print(
        "two_dimensional_array",
        "        int[][] grid = new int[2][3];\n        grid[1][2] = 5;\n        System.out.println(grid[1][2] + grid[0][2]);\n        System.out.println(Arrays.toString(grid[1]));",
        &["5", "[0, 0, 5]"],
    ));

    suite
}

fn create_control_flow_tests() -> TestSuite {
    let mut suite = TestSuite::new("Control Flow");

    suite.add_test(TestCase::should_print(
        "counted_loop",
        "        int total = 0;\n        for (int i = 1; i <= 4; i++) {\n            total += i;\n        }\n        System.out.println(total);",
        &["10"],
    ));
    suite.add_test(TestCase::should_print(
        "enhanced_for_over_array",
        "        int[] xs = {3, 4};\n        for (int x : xs) {\n            System.out.println(x * 2);\n        }",
        &["6", "8"],
    ));
    suite.add_test(TestCase::should_print(
        "while_with_break_and_continue",
        "        int i = 0;\n        while (true) {\n            i++;\n            if (i == 2) {\n                continue;\n            }\n            if (i > 3) {\n                break;\n            }\n            System.out.println(\"i=\" + i);\n        }",
        &["i=1", "i=3"],
    ));
    suite.add_test(TestCase::should_print(
        "do_while_runs_once",
        "        int n = 10;\n        do {\n            System.out.println(\"once\");\n        } while (n < 5);",
        &["once"],
    ));
    suite.add_test(TestCase::should_print(
        "return_ends_run",
        "        System.out.println(\"first\");\n        if (true) {\n            return;\n        }\n        System.out.println(\"never\");",
        &["first"],
    ));

    suite
}

fn create_library_tests() -> TestSuite {
    let mut suite = TestSuite::new("Runtime Library");

    suite.add_test(TestCase::should_print(
        "array_list",
        "        List<String> names = new ArrayList<>();\n        names.add(\"a\");\n        names.add(\"b\");\n        System.out.println(names.size() + \" \" + names);",
        &["2 [a, b]"],
    ));
    suite.add_test(TestCase::should_print(
        "hash_map",
        "        Map<String, Integer> ages = new HashMap<>();\n        ages.put(\"ann\", 31);\n        System.out.println(ages.get(\"ann\"));\n        System.out.println(ages.containsKey(\"bob\"));",
        &["31", "false"],
    ));
    suite.add_test(TestCase::should_print(
        "printf_and_format",
        "        System.out.printf(\"%.2f%n\", 3.14159);\n        System.out.println(String.format(\"%5d|\", 42));",
        &["3.14", "   42|"],
    ));
    suite.add_test(TestCase::should_print(
        "string_methods",
        "        String s = \"Hello\";\n        System.out.println(s.length() + \" \" + s.toUpperCase() + \" \" + s.charAt(1));\n        System.out.println(s.substring(1, 3));",
        &["5 HELLO e", "el"],
    ));
    suite.add_test(TestCase::should_print(
        "math_statics",
        "        System.out.println(Math.max(3, 9));\n        System.out.println(Math.abs(-2.5));\n        System.out.println(Math.sqrt(16));",
        &["9", "2.5", "4.0"],
    ));
    suite.add_test(TestCase::should_print(
        "parse_integer",
        "        int n = Integer.parseInt(\"41\") + 1;\n        System.out.println(n);",
        &["42"],
    ));
    suite.add_test(TestCase::should_print(
        "arrays_sort",
        "        int[] xs = {3, 1, 2};\n        Arrays.sort(xs);\n        System.out.println(Arrays.toString(xs));",
        &["[1, 2, 3]"],
    ));

    suite
}

fn create_runtime_fault_tests() -> TestSuite {
    let mut suite = TestSuite::new("Runtime Faults");

    suite.add_test(TestCase::should_fail_with_message(
        "division_by_zero",
        Stage::Run,
        &program("        int zero = 0;\n        System.out.println(1 / zero);"),
        "Error at line 4: ArithmeticException: / by zero",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "array_index_out_of_bounds",
        Stage::Run,
        &program("        int[] xs = new int[2];\n        xs[2] = 1;"),
        "Index 2 out of bounds for length 2",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "number_format",
        Stage::Run,
        &program("        int n = Integer.parseInt(\"abc\");"),
        "For input string: \"abc\"",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unresolved_variable",
        Stage::Run,
        &program("        System.out.println(missing);"),
        "missing cannot be resolved to a variable",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "non_boolean_condition",
        Stage::Run,
        &program("        int x = 1;\n        if (x) {\n            x = 2;\n        }"),
        "cannot convert from int to boolean",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "user_types_are_not_translated",
        Stage::Run,
        &program("        Point p = new Point();"),
        "Point cannot be resolved",
    ));
    suite.add_test(TestCase::should_fail(
        "structural_error_stops_run",
        Stage::Run,
        &program("        int x = 1"),
    ));

    suite
}

fn create_input_tests() -> TestSuite {
    let mut suite = TestSuite::new("Program Input");

    let greeting = "        Scanner sc = new Scanner(System.in);\n        System.out.print(\"Name: \");\n        String name = sc.nextLine();\n        System.out.print(\"Age: \");\n        int age = sc.nextInt();\n        System.out.println(name + \" is \" + (age + 1) + \" next year\");";

    suite.add_test(
        TestCase::should_print("reads_in_order", greeting, &["Name: Alice", "Age: 30", "Alice is 31 next year"])
            .with_input(&["Alice", "30"]),
    );
    suite.add_test(
        TestCase::should_print(
            "missing_number_reads_zero",
            "        Scanner sc = new Scanner(System.in);\n        int n = sc.nextInt();\n        System.out.println(\"n=\" + n);",
            &["", "n=0"],
        )
        .with_input(&[]),
    );
    suite.add_test(
        TestCase::should_print(
            "tokens_split_on_whitespace",
            "        Scanner sc = new Scanner(System.in);\n        int a = sc.nextInt();\n        int b = sc.nextInt();\n        System.out.println(a * b);",
            &["3", "4", "12"],
        )
        .with_input(&["3 4"]),
    );

    suite
}

// ============================================================================
// Main Test Function
// ============================================================================

#[test]
fn comprehensive_pipeline_tests() {
    println!("🧪 javasim Pipeline Test Suite");
    println!("==============================\n");

    let mut all_passed = true;

    let suites = vec![
        create_structure_tests(),
        create_literal_span_tests(),
        create_translation_tests(),
        create_semantics_tests(),
        create_control_flow_tests(),
        create_library_tests(),
        create_runtime_fault_tests(),
        create_input_tests(),
    ];

    for suite in suites {
        let results = suite.run();
        if !results.is_all_passed() {
            all_passed = false;
        }
    }

    if all_passed {
        println!("🎉 ALL TESTS PASSED!");
    } else {
        println!("⚠️  Some tests failed. See output above for details.");
    }

    assert!(all_passed, "some pipeline suites had failing or crashing cases");
}

#[test]
fn missing_entry_point_is_reported_once() {
    let source = "public class Wrong {\n    static void helper() {\n        int x = 1\n    }\n}\n}\n";
    let issues = validate(source, "Main.java");

    assert_eq!(issues.iter().filter(|issue| issue.message == MISSING_ENTRY_POINT).count(), 1);
    assert_eq!(issues.len(), 4, "{:?}", issues);
}

#[test]
fn one_line_program_runs() {
    let source = r#"class Foo { public static void main(String[] args) { System.out.println("hi"); } }"#;
    let result = run_to_completion(source, "Foo.java", &RunConfig::default(), &mut QueuedInput::default());

    assert_eq!(result.status, RunStatus::Success, "problems: {:?}", result.problems);
    assert_eq!(
        result.console_lines,
        vec!["Compilation successful.", "> Running...", "hi", "Execution finished."]
    );
}

#[test]
fn translated_body_keeps_line_count() {
    let source = program("        int a = 1;\n        // comment\n        String s = \"x\";\n\n        int[] xs = {1,\n 2};");
    let body = extract_entry_body(&source).expect("entry body");
    assert_eq!(translate(&body.text).lines().count(), body.text.lines().count());
}
