//! Pre-run input collection for programs that read from a `Scanner`.
//!
//! The run cannot block on stdin while it executes, so every value is
//! gathered up front. The collector guesses one prompt per scanner read
//! from the literal text printed just before it, hands the prompts to the
//! caller, and turns the reply into an [`InputQueue`].

use crate::segment::{code_view, segment};
use crate::shim::scanner::InputQueue;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static SCANNER_CONSTRUCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bnew\s+(?:java\s*\.\s*util\s*\.\s*)?Scanner\s*\(").expect("scanner construction pattern")
});

static SCANNER_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_$][\w$]*)\s*=\s*new\s+(?:java\s*\.\s*util\s*\.\s*)?Scanner\s*\(")
        .expect("scanner binding pattern")
});

static LITERAL_PRINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"System\s*\.\s*out\s*\.\s*print(?:ln)?\s*\(\s*"((?:[^"\\\n]|\\.)*)"\s*\)"#)
        .expect("literal print pattern")
});

/// Prompts for the values a run will read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    pub prompts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputResponse {
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputReply {
    Provided(InputResponse),
    Cancelled,
}

impl InputReply {
    pub fn values<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        InputReply::Provided(InputResponse {
            values: values.into_iter().map(Into::into).collect(),
        })
    }
}

/// Answers input requests synchronously.
pub trait InputProvider {
    fn provide(&mut self, request: &InputRequest) -> InputReply;
}

/// Fixed answers given up front, e.g. from the command line.
#[derive(Debug, Clone, Default)]
pub struct QueuedInput {
    values: Vec<String>,
}

impl QueuedInput {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }
}

impl InputProvider for QueuedInput {
    fn provide(&mut self, request: &InputRequest) -> InputReply {
        tracing::debug!(
            prompts = request.prompts.len(),
            values = self.values.len(),
            "answering input request from queued values"
        );
        InputReply::values(std::mem::take(&mut self.values))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Idle,
    AwaitingInput,
    Satisfied,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("input collector cannot {action} while {state:?}")]
pub struct InputStateError {
    pub action: &'static str,
    pub state: InputState,
}

/// `Idle -> AwaitingInput -> Satisfied | Cancelled`, one request per run.
#[derive(Debug)]
pub struct InputCollector {
    state: InputState,
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputCollector {
    pub fn new() -> Self {
        Self {
            state: InputState::Idle,
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    /// Builds the request for `source` and starts waiting for its reply.
    pub fn request(&mut self, source: &str, generic_prompt: &str) -> Result<InputRequest, InputStateError> {
        self.transition("request input", InputState::Idle, InputState::AwaitingInput)?;
        let prompts = extract_prompts(source, generic_prompt);
        tracing::debug!(?prompts, "requesting program input");
        Ok(InputRequest { prompts })
    }

    /// Accepts the reply. `None` means the user cancelled.
    pub fn resolve(&mut self, reply: InputReply) -> Result<Option<InputQueue>, InputStateError> {
        match reply {
            InputReply::Provided(response) => {
                self.transition("accept input", InputState::AwaitingInput, InputState::Satisfied)?;
                let queue = InputQueue::from_values(&response.values);
                tracing::debug!(tokens = queue.remaining(), "input satisfied");
                Ok(Some(queue))
            }
            InputReply::Cancelled => {
                self.transition("cancel input", InputState::AwaitingInput, InputState::Cancelled)?;
                tracing::debug!("input cancelled");
                Ok(None)
            }
        }
    }

    fn transition(&mut self, action: &'static str, from: InputState, to: InputState) -> Result<(), InputStateError> {
        if self.state != from {
            return Err(InputStateError {
                action,
                state: self.state,
            });
        }
        self.state = to;
        Ok(())
    }
}

/// Whether the program constructs a `Scanner` outside strings and comments.
pub fn needs_input(source: &str) -> bool {
    SCANNER_CONSTRUCTION.is_match(&code_view(&segment(source)))
}

/// One prompt per scanner read that has a literal print before it (and
/// after the previous read). Falls back to `generic_prompt` alone.
pub fn extract_prompts(source: &str, generic_prompt: &str) -> Vec<String> {
    let code = code_view(&segment(source));

    let names: Vec<String> = SCANNER_BINDING
        .captures_iter(&code)
        .map(|caps| regex::escape(&caps[1]))
        .collect();

    let mut prompts = Vec::new();
    if !names.is_empty() {
        let reads = Regex::new(&format!(r"\b(?:{})\s*\.\s*next[A-Za-z]*\s*\(", names.join("|")));
        let printed: Vec<(usize, String)> = LITERAL_PRINT
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                code[whole.start()..]
                    .starts_with("System")
                    .then(|| (whole.start(), unescape(&caps[1]).trim().to_string()))
            })
            .collect();

        if let Ok(reads) = reads {
            let mut previous_read = 0;
            for read in reads.find_iter(&code) {
                let prompt = printed
                    .iter()
                    .rev()
                    .find(|(offset, _)| *offset >= previous_read && *offset < read.start());
                if let Some((_, text)) = prompt {
                    prompts.push(text.clone());
                }
                previous_read = read.end();
            }
        }
    }

    if prompts.is_empty() {
        prompts.push(generic_prompt.to_string());
    }
    prompts
}

/// Resolves the escapes a prompt literal may contain.
fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

impl fmt::Display for InputRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.prompts.join(", "))
    }
}
