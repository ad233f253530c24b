use crate::error::ValidationIssue;
use crate::extract::ENTRY_METHOD;
use crate::segment::{code_view, comment_free_view, segment};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub const MISSING_ENTRY_POINT: &str = "Missing entry point: public static void main(String[] args).";
pub const INCOMPLETE_STATEMENT: &str = "Missing semicolon or incomplete statement.";
pub const EXTRA_CLOSING_BRACE: &str = "Extra closing brace.";
pub const EXTRA_CLOSING_PAREN: &str = "Extra closing parenthesis.";

static ENTRY_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:public\s+)?(?:(?:final|abstract)\s+)*class\s+([A-Za-z_$][\w$]*)")
        .expect("entry class pattern")
});

static DECLARATION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(public|private|protected|static|final|abstract|class|interface|enum|@interface|implements|extends)",
    )
    .expect("declaration keyword pattern")
});

static METHOD_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(public|private|protected|static|final|abstract|synchronized|native|strictfp)?\s*[\w<>\[\]]+\s+\w+\s*\(.*\)\s*\{?$",
    )
    .expect("method header pattern")
});

static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@").expect("annotation pattern"));
static LEADING_CLOSE_BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\}").expect("closing brace pattern"));
static FOR_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*for\s*\(.*\)\s*\{?$").expect("for pattern"));
static IF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*if\s*\(.*\)\s*\{?$").expect("if pattern"));
static ELSE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*else(\s*if\s*\(.*\))?\s*\{?$").expect("else pattern"));
static WHILE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*while\s*\(.*\)\s*\{?$").expect("while pattern"));
static TRY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*try\s*\{?$").expect("try pattern"));
static CATCH_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*catch\s*\(.*\)\s*\{?$").expect("catch pattern"));
static FINALLY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*finally\s*\{?$").expect("finally pattern"));

/// Reasons a non-empty line is accepted without a statement terminator.
///
/// Several of these overlap (an annotation line also starts with a
/// declaration keyword once `@interface` is involved, a `}` line both ends
/// and starts with a brace). They are always tried in `EXEMPTIONS` order and
/// the first match is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exemption {
    Terminated,
    OpensBlock,
    ClosesBlock,
    LineComment,
    BlockCommentStart,
    BlockCommentEnd,
    CommentContinuation,
    Import,
    Package,
    DeclarationKeyword,
    MethodHeader,
    Annotation,
    LeadingCloseBrace,
    ForHeader,
    IfHeader,
    ElseHeader,
    WhileHeader,
    TryHeader,
    CatchHeader,
    FinallyHeader,
}

pub const EXEMPTIONS: [Exemption; 20] = [
    Exemption::Terminated,
    Exemption::OpensBlock,
    Exemption::ClosesBlock,
    Exemption::LineComment,
    Exemption::BlockCommentStart,
    Exemption::BlockCommentEnd,
    Exemption::CommentContinuation,
    Exemption::Import,
    Exemption::Package,
    Exemption::DeclarationKeyword,
    Exemption::MethodHeader,
    Exemption::Annotation,
    Exemption::LeadingCloseBrace,
    Exemption::ForHeader,
    Exemption::IfHeader,
    Exemption::ElseHeader,
    Exemption::WhileHeader,
    Exemption::TryHeader,
    Exemption::CatchHeader,
    Exemption::FinallyHeader,
];

impl Exemption {
    /// `trimmed` is the line with surrounding whitespace removed.
    pub fn matches(self, trimmed: &str) -> bool {
        match self {
            Exemption::Terminated => trimmed.ends_with(';'),
            Exemption::OpensBlock => trimmed.ends_with('{'),
            Exemption::ClosesBlock => trimmed.ends_with('}'),
            Exemption::LineComment => trimmed.starts_with("//"),
            Exemption::BlockCommentStart => trimmed.starts_with("/*"),
            Exemption::BlockCommentEnd => trimmed.ends_with("*/"),
            Exemption::CommentContinuation => trimmed.starts_with('*'),
            Exemption::Import => trimmed.starts_with("import"),
            Exemption::Package => trimmed.starts_with("package"),
            Exemption::DeclarationKeyword => DECLARATION_KEYWORD.is_match(trimmed),
            Exemption::MethodHeader => METHOD_HEADER.is_match(trimmed),
            Exemption::Annotation => ANNOTATION.is_match(trimmed),
            Exemption::LeadingCloseBrace => LEADING_CLOSE_BRACE.is_match(trimmed),
            Exemption::ForHeader => FOR_HEADER.is_match(trimmed),
            Exemption::IfHeader => IF_HEADER.is_match(trimmed),
            Exemption::ElseHeader => ELSE_HEADER.is_match(trimmed),
            Exemption::WhileHeader => WHILE_HEADER.is_match(trimmed),
            Exemption::TryHeader => TRY_HEADER.is_match(trimmed),
            Exemption::CatchHeader => CATCH_HEADER.is_match(trimmed),
            Exemption::FinallyHeader => FINALLY_HEADER.is_match(trimmed),
        }
    }
}

/// First exemption that accepts `line`, in table order.
pub fn exemption_for(line: &str) -> Option<Exemption> {
    let trimmed = line.trim();
    EXEMPTIONS.iter().copied().find(|rule| rule.matches(trimmed))
}

/// The identifier the entry class must carry: the filename without its
/// directory or extension.
pub fn entry_class_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

/// Runs every structural check and collects all issues, grouped by check in
/// the order the checks run.
pub fn validate(source: &str, filename: &str) -> Vec<ValidationIssue> {
    let spans = segment(source);
    let code = code_view(&spans);
    let mut issues = Vec::new();

    check_entry_class(&code, filename, &mut issues);
    check_entry_method(&code, &mut issues);
    check_statement_completion(&comment_free_view(&spans), &mut issues);
    check_balance(&code, &mut issues);

    tracing::debug!(filename, issues = issues.len(), "validated source");
    issues
}

fn check_entry_class(code: &str, filename: &str, issues: &mut Vec<ValidationIssue>) {
    let expected = entry_class_name(filename);
    let found = ENTRY_CLASS
        .captures_iter(code)
        .any(|captures| &captures[1] == expected.as_str());

    if !found {
        issues.push(ValidationIssue::unplaced(format!(
            "Public class '{}' must be declared in {}.",
            expected, filename
        )));
    }
}

fn check_entry_method(code: &str, issues: &mut Vec<ValidationIssue>) {
    if !ENTRY_METHOD.is_match(code) {
        issues.push(ValidationIssue::unplaced(MISSING_ENTRY_POINT));
    }
}

fn check_statement_completion(comment_free: &str, issues: &mut Vec<ValidationIssue>) {
    for (index, line) in comment_free.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if exemption_for(line).is_none() {
            issues.push(ValidationIssue::at_line(index + 1, INCOMPLETE_STATEMENT));
        }
    }
}

fn check_balance(code: &str, issues: &mut Vec<ValidationIssue>) {
    let mut braces: Vec<usize> = Vec::new();
    let mut parens: Vec<usize> = Vec::new();

    let mut line = 1;

    for c in code.chars() {
        match c {
            '\n' => line += 1,
            '{' => braces.push(line),
            '(' => parens.push(line),
            '}' => {
                if braces.pop().is_none() {
                    issues.push(ValidationIssue::at_line(line, EXTRA_CLOSING_BRACE));
                }
            }
            ')' => {
                if parens.pop().is_none() {
                    issues.push(ValidationIssue::at_line(line, EXTRA_CLOSING_PAREN));
                }
            }
            _ => {}
        }
    }

    for line in braces {
        issues.push(ValidationIssue::at_line(
            line,
            format!("Mismatched curly braces. Unclosed brace from line {}.", line),
        ));
    }
    for line in parens {
        issues.push(ValidationIssue::at_line(
            line,
            format!("Mismatched parentheses. Unclosed parenthesis from line {}.", line),
        ));
    }
}
