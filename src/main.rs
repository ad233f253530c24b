use clap::{Arg, ArgAction, ArgMatches, Command};
use javasim::dialog::TerminalDialog;
use javasim::extract::extract_entry_body;
use javasim::runner::parse_translated;
use javasim::{
    format_source, run_to_completion, translate, validate, ExecutionResult, InputProvider, QueuedInput, RunConfig,
    RunStatus,
};
use std::fs;
use std::path::Path;
use std::process;

const EXIT_FAILURE: i32 = 1;
const EXIT_CANCELLED: i32 = 130;

fn main() {
    let matches = Command::new("javasim")
        .about("Compile-and-run simulator for single-file Java programs")
        .arg(
            Arg::new("file")
                .help("The Java source file to run")
                .value_name("FILE")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("VALUE")
                .help("Answer an input prompt without asking (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Only validate the source")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("translate")
                .long("translate")
                .help("Print the translated entry body instead of running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Print the re-indented source")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .help("Seed for Random and Math.random")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("no-echo")
                .long("no-echo")
                .help("Do not echo consumed input into the console")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log phase details to stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let Some(file_path) = matches.get_one::<String>("file") else {
        process::exit(EXIT_FAILURE);
    };
    let (source, filename) = read_source(file_path);

    if matches.get_flag("format") {
        println!("{}", format_source(&source));
    } else if matches.get_flag("check") {
        check_file(&source, &filename);
    } else if matches.get_flag("translate") {
        translate_file(&source, &filename);
    } else {
        run_file(&source, &filename, &matches);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(path: &str) -> (String, String) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        process::exit(EXIT_FAILURE);
    }

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match fs::read_to_string(path) {
        Ok(source) => (source, filename),
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(EXIT_FAILURE);
        }
    }
}

fn check_file(source: &str, filename: &str) {
    let issues = validate(source, filename);
    if issues.is_empty() {
        println!("{}: no problems found", filename);
        return;
    }
    for issue in &issues {
        issue.report(source, filename);
    }
    process::exit(EXIT_FAILURE);
}

fn translate_file(source: &str, filename: &str) {
    let Some(body) = extract_entry_body(source) else {
        eprintln!("Error: no main method found in '{}'", filename);
        process::exit(EXIT_FAILURE);
    };
    let translated = translate(&body.text);
    println!("{}", translated);

    // Faults the interpreter would hit before running anything.
    if let Err(error) = parse_translated(&translated) {
        error.report(&translated, Some(filename));
        process::exit(EXIT_FAILURE);
    }
}

fn run_file(source: &str, filename: &str, matches: &ArgMatches) {
    let mut config = RunConfig::default().with_echo(!matches.get_flag("no-echo"));
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config = config.with_seed(*seed);
    }

    let mut provider: Box<dyn InputProvider> = match matches.get_many::<String>("input") {
        Some(values) => Box::new(QueuedInput::new(values.cloned().collect())),
        None => Box::new(TerminalDialog::stdio()),
    };

    let result = run_to_completion(source, filename, &config, provider.as_mut());
    print_result(&result, source, filename);

    match result.status {
        RunStatus::Success => {}
        RunStatus::Cancelled => process::exit(EXIT_CANCELLED),
        RunStatus::CompileError | RunStatus::RuntimeError => process::exit(EXIT_FAILURE),
    }
}

fn print_result(result: &ExecutionResult, source: &str, filename: &str) {
    if result.status == RunStatus::Cancelled {
        eprintln!("Run cancelled.");
        return;
    }
    for line in &result.console_lines {
        println!("{}", line);
    }
    for problem in &result.problems {
        problem.report(source, filename);
    }
}
