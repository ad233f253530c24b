use crate::error::ValidationIssue;

pub const COMPILE_FAILED_BANNER: &str = "Compilation failed with errors:";
pub const COMPILE_OK_BANNER: &str = "Compilation successful.";
pub const RUNNING_BANNER: &str = "> Running...";
pub const COMPLETION_MARKER: &str = "Execution finished.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    CompileError,
    RuntimeError,
    /// The input dialog was dismissed; nothing ran.
    Cancelled,
}

/// Terminal outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub status: RunStatus,
    pub console_lines: Vec<String>,
    pub problems: Vec<ValidationIssue>,
}

impl ExecutionResult {
    pub fn compile_error(issues: Vec<ValidationIssue>) -> Self {
        Self {
            status: RunStatus::CompileError,
            console_lines: vec![COMPILE_FAILED_BANNER.to_string()],
            problems: issues,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            status: RunStatus::Cancelled,
            console_lines: Vec::new(),
            problems: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

/// Collects `print`/`println` output for one run.
///
/// `print` text accumulates in a pending line until a `println` flushes it.
/// Embedded newlines split into separate finished lines.
#[derive(Debug, Default)]
pub struct OutputAssembler {
    lines: Vec<String>,
    pending: String,
}

impl OutputAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&mut self, text: &str) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.pending.push_str(first);
        }
        for part in parts {
            self.lines.push(std::mem::take(&mut self.pending));
            self.pending.push_str(part);
        }
    }

    pub fn println(&mut self, text: &str) {
        self.print(text);
        self.lines.push(std::mem::take(&mut self.pending));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Finishes a successful run: a non-empty pending line becomes the last
    /// line, then the banner and completion marker are wrapped around.
    pub fn into_success(mut self) -> ExecutionResult {
        if !self.pending.is_empty() {
            self.lines.push(std::mem::take(&mut self.pending));
        }
        let mut console_lines = running_banner();
        console_lines.extend(self.lines);
        console_lines.push(COMPLETION_MARKER.to_string());

        ExecutionResult {
            status: RunStatus::Success,
            console_lines,
            problems: Vec::new(),
        }
    }

    /// Finishes a faulted run. Only lines flushed before the fault are kept.
    pub fn into_runtime_error(self, fault: ValidationIssue) -> ExecutionResult {
        let mut console_lines = running_banner();
        console_lines.extend(self.lines);

        ExecutionResult {
            status: RunStatus::RuntimeError,
            console_lines,
            problems: vec![fault],
        }
    }
}

fn running_banner() -> Vec<String> {
    vec![COMPILE_OK_BANNER.to_string(), RUNNING_BANNER.to_string()]
}
