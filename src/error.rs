use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
    ParseError,
    RuntimeError,
}

/// A fault raised while lexing, parsing or evaluating translated statements.
/// Spans are byte offsets into the translated text.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct SimError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl SimError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn lex_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::LexError, span, message)
    }

    pub fn parse_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::ParseError, span, message)
    }

    pub fn parse_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::ParseError, span, message, help)
    }

    pub fn runtime_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::RuntimeError, span, message)
    }

    pub fn runtime_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::RuntimeError, span, message, help)
    }

    fn kind_label(&self) -> (&'static str, Color) {
        match self.kind {
            ErrorKind::LexError => ("Lexical Error", Color::Red),
            ErrorKind::ParseError => ("Parse Error", Color::Yellow),
            ErrorKind::RuntimeError => ("Runtime Error", Color::Magenta),
        }
    }

    /// Renders this error against the translated text it was raised on.
    pub fn report(&self, translated: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<main>");
        let (kind_str, color) = self.kind_label();
        let end = self.span.end.min(translated.len()).max(self.span.start);

        let mut report_builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message))
            .with_label(
                Label::new((filename, self.span.start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        if let Err(error) = report_builder
            .finish()
            .eprint((filename, Source::from(translated)))
        {
            eprintln!("{}: {}", kind_str, self.message);
            tracing::warn!(%error, "failed to render diagnostic");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

/// A compile-time style problem (or the single runtime fault of a run),
/// positioned by 1-based source line where one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub line: Option<usize>,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn unplaced(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Renders the issue against the original source, labelling the whole
    /// offending line.
    pub fn report(&self, source: &str, filename: &str) {
        let range = self
            .line
            .and_then(|line| line_range(source, line))
            .unwrap_or(0..0);

        let mut report_builder = Report::build(ReportKind::Error, filename, range.start)
            .with_message(format!("{}: {}", "Error".fg(Color::Red), self.message));
        if self.line.is_some() {
            report_builder = report_builder.with_label(
                Label::new((filename, range))
                    .with_message(&self.message)
                    .with_color(Color::Red),
            );
        }

        if let Err(error) = report_builder
            .finish()
            .eprint((filename, Source::from(source)))
        {
            eprintln!("{}", self);
            tracing::warn!(%error, "failed to render diagnostic");
        }
    }
}

fn line_range(source: &str, line: usize) -> Option<std::ops::Range<usize>> {
    let mut start = 0;
    for (index, text) in source.split('\n').enumerate() {
        if index + 1 == line {
            return Some(start..start + text.len());
        }
        start += text.len() + 1;
    }
    None
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Error at line {}: {}", line, self.message),
            None => write!(f, "Error: {}", self.message),
        }
    }
}
