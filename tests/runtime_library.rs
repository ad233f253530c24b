// Whole runs exercising the standard library shims.

use javasim::output::COMPLETION_MARKER;
use javasim::{run_to_completion, ExecutionResult, QueuedInput, RunConfig, RunStatus};

fn run_with(body: &str, config: &RunConfig) -> ExecutionResult {
    let source = format!(
        "public class Main {{\n    public static void main(String[] args) {{\n{}\n    }}\n}}\n",
        body
    );
    run_to_completion(&source, "Main.java", config, &mut QueuedInput::default())
}

/// Program output without the banners, for a successful run.
fn output(body: &str) -> Vec<String> {
    output_with(body, &RunConfig::default().with_seed(11))
}

fn output_with(body: &str, config: &RunConfig) -> Vec<String> {
    let result = run_with(body, config);
    assert_eq!(result.status, RunStatus::Success, "problems: {:?}", result.problems);
    assert_eq!(result.console_lines.last().map(String::as_str), Some(COMPLETION_MARKER));
    let lines = &result.console_lines;
    lines[2..lines.len() - 1].to_vec()
}

fn fault(body: &str) -> String {
    let result = run_with(body, &RunConfig::default());
    assert_eq!(result.status, RunStatus::RuntimeError);
    assert_eq!(result.problems.len(), 1);
    result.problems[0].message.clone()
}

#[test]
fn seeded_random_is_reproducible() {
    let body = "        Random r = new Random();\n        System.out.println(r.nextInt(1000) + \",\" + r.nextInt(1000));\n        System.out.println(Math.random() < 1.0);";
    let config = RunConfig::default().with_seed(99);
    assert_eq!(output_with(body, &config), output_with(body, &config));
}

#[test]
fn explicit_random_seed_ignores_run_seed() {
    let body = "        Random r = new Random(42);\n        System.out.println(r.nextInt(100));";
    assert_eq!(
        output_with(body, &RunConfig::default().with_seed(1)),
        output_with(body, &RunConfig::default().with_seed(2))
    );
}

#[test]
fn random_bound_must_be_positive() {
    let message = fault("        Random r = new Random();\n        int n = r.nextInt(0);");
    assert!(message.starts_with("IllegalArgumentException"), "{}", message);
}

#[test]
fn big_decimal_is_exact() {
    assert_eq!(
        output("        BigDecimal a = new BigDecimal(\"0.1\");\n        System.out.println(a.add(new BigDecimal(\"0.2\")));"),
        vec!["0.3"]
    );
    assert_eq!(output("        System.out.println(0.1 + 0.2);"), vec!["0.30000000000000004"]);
}

#[test]
fn big_integer_exceeds_long() {
    assert_eq!(
        output("        BigInteger big = new BigInteger(\"9223372036854775807\");\n        System.out.println(big.add(BigInteger.ONE));"),
        vec!["9223372036854775808"]
    );
}

#[test]
fn big_integer_factorial() {
    assert_eq!(
        output(concat!(
            "        BigInteger f = BigInteger.ONE;\n",
            "        for (int i = 1; i <= 40; i++) {\n",
            "            f = f.multiply(BigInteger.valueOf(i));\n",
            "        }\n",
            "        System.out.println(f);",
        )),
        vec!["815915283247897734345611269596115894272000000000"]
    );
}

#[test]
fn big_decimal_accepts_exponents() {
    assert_eq!(
        output(concat!(
            "        BigDecimal k = new BigDecimal(\"1e3\");\n",
            "        System.out.println(k);\n",
            "        System.out.println(k.toPlainString());\n",
            "        System.out.println(k.add(new BigDecimal(\"0.5\")));\n",
            "        System.out.println(k.compareTo(BigDecimal.valueOf(1000)));",
        )),
        vec!["1E+3", "1000", "1000.5", "0"]
    );
}

#[test]
fn big_integer_divide_by_zero_faults() {
    assert_eq!(
        fault("        BigInteger q = BigInteger.TEN.divide(BigInteger.ZERO);"),
        "ArithmeticException: BigInteger divide by zero"
    );
}

#[test]
fn integer_parsing_respects_width() {
    assert_eq!(
        fault("        int n = Integer.parseInt(\"99999999999\");"),
        "NumberFormatException: For input string: \"99999999999\""
    );
    assert_eq!(
        output("        long n = Long.parseLong(\"99999999999\");\n        System.out.println(n + 1);"),
        vec!["100000000000"]
    );
}

#[test]
fn two_dimensional_arrays_have_independent_rows() {
    assert_eq!(
        output(concat!(
            "        int[][] grid = new int[2][3];\n",
            "        grid[1][2] = 5;\n",
            "        System.out.println(grid[0][2] + \" \" + grid[1][2] + \" \" + grid[1].length);\n",
            "        String[][] rows = new String[2][];\n",
            "        System.out.println(rows[0] == null);",
        )),
        vec!["0 5 3", "true"]
    );
}

#[test]
fn date_and_clock() {
    assert_eq!(
        output("        Date d = new Date();\n        System.out.println(d.getTime() > 0);\n        System.out.println(System.currentTimeMillis() > 0);"),
        vec!["true", "true"]
    );
}

#[test]
fn string_helpers() {
    assert_eq!(
        output(concat!(
            "        String csv = \"a,b,,c\";\n",
            "        String[] parts = csv.split(\",\");\n",
            "        System.out.println(parts.length);\n",
            "        System.out.println(String.join(\"-\", parts));\n",
            "        System.out.println(\"ab\".repeat(3) + \" \" + \"Hello\".indexOf('l'));\n",
            "        System.out.println(Character.isDigit('7') + \" \" + Character.toUpperCase('q'));",
        )),
        vec!["4", "a-b--c", "ababab 2", "true Q"]
    );
}

#[test]
fn format_flags() {
    assert_eq!(
        output(concat!(
            "        System.out.println(String.format(\"%-5s|%5s|\", \"ab\", \"cd\"));\n",
            "        System.out.println(String.format(\"%,d\", 1234567));\n",
            "        System.out.println(String.format(\"%08.3f\", 3.14159));\n",
            "        System.out.printf(\"%s scored %d%%%n\", \"Ann\", 95);",
        )),
        vec!["ab   |   cd|", "1,234,567", "0003.142", "Ann scored 95%"]
    );
}

#[test]
fn format_argument_faults() {
    assert_eq!(
        fault("        String s = String.format(\"%d\", \"x\");"),
        "IllegalFormatConversionException: d != String"
    );
}

#[test]
fn collections_iterate_in_insertion_order() {
    assert_eq!(
        output(concat!(
            "        Map<String, Integer> stock = new LinkedHashMap<>();\n",
            "        stock.put(\"pears\", 3);\n",
            "        stock.put(\"apples\", 5);\n",
            "        for (String k : stock.keySet()) {\n",
            "            System.out.println(k + \"=\" + stock.get(k));\n",
            "        }\n",
            "        List<Integer> xs = new ArrayList<>();\n",
            "        xs.add(4);\n",
            "        xs.add(8);\n",
            "        xs.add(0, 1);\n",
            "        xs.remove(1);\n",
            "        System.out.println(xs + \" \" + xs.contains(8));",
        )),
        vec!["pears=3", "apples=5", "[1, 8] true"]
    );
}

#[test]
fn list_index_faults() {
    let message = fault("        List<String> xs = new ArrayList<>();\n        xs.get(3);");
    assert_eq!(message, "IndexOutOfBoundsException: Index 3 out of bounds for length 0");
}

#[test]
fn unknown_methods_are_reported() {
    let message = fault("        String s = \"x\";\n        s.frobnicate();");
    assert_eq!(message, "The method frobnicate() is undefined for the type String");
}

#[test]
fn command_line_args_are_empty() {
    assert_eq!(output("        System.out.println(args.length);"), vec!["0"]);
}
