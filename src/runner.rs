use crate::ast::Program;
use crate::config::RunConfig;
use crate::error::{SimError, ValidationIssue};
use crate::evaluator::Evaluator;
use crate::extract::extract_entry_body;
use crate::input::{needs_input, InputCollector, InputProvider, InputReply, InputRequest, InputStateError};
use crate::lexer::Lexer;
use crate::output::ExecutionResult;
use crate::parser::Parser;
use crate::segment::line_of;
use crate::shim::scanner::InputQueue;
use crate::shim::RunContext;
use crate::translate::translate;
use crate::validate::validate;

/// Where a run stands after `Session::run`.
#[derive(Debug)]
pub enum RunStep {
    Finished(ExecutionResult),
    /// The run is suspended until `Session::submit_input` answers this.
    NeedsInput(InputRequest),
}

/// A validated and translated run waiting for its input.
#[derive(Debug)]
pub struct PendingRun {
    translated: String,
    body_start_line: usize,
    collector: InputCollector,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no run is waiting for input")]
    NothingPending,
    #[error(transparent)]
    InputState(#[from] InputStateError),
}

/// Runs programs one at a time; holds at most one suspended run.
#[derive(Debug, Default)]
pub struct Session {
    config: RunConfig,
    pending: Option<PendingRun>,
}

impl Session {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a run of `source`. Any run still waiting for input is dropped.
    pub fn run(&mut self, source: &str, filename: &str) -> RunStep {
        if self.pending.take().is_some() {
            tracing::debug!("dropping run that was waiting for input");
        }

        let issues = validate(source, filename);
        if !issues.is_empty() {
            tracing::debug!(issues = issues.len(), "compilation failed");
            return RunStep::Finished(ExecutionResult::compile_error(issues));
        }

        let (body, body_start_line) = match extract_entry_body(source) {
            Some(body) => (body.text, body.start_line),
            None => (String::new(), 1),
        };
        let translated = translate(&body);
        tracing::debug!(bytes = translated.len(), "translated entry body");

        if !needs_input(source) {
            return RunStep::Finished(execute(&translated, body_start_line, InputQueue::default(), &self.config));
        }

        let mut collector = InputCollector::new();
        match collector.request(source, &self.config.generic_prompt) {
            Ok(request) => {
                self.pending = Some(PendingRun {
                    translated,
                    body_start_line,
                    collector,
                });
                RunStep::NeedsInput(request)
            }
            Err(err) => {
                tracing::warn!(%err, "fresh input collector refused a request");
                RunStep::Finished(execute(&translated, body_start_line, InputQueue::default(), &self.config))
            }
        }
    }

    /// Resumes the suspended run with the user's reply.
    pub fn submit_input(&mut self, reply: InputReply) -> Result<ExecutionResult, SessionError> {
        let mut pending = self.pending.take().ok_or(SessionError::NothingPending)?;
        let result = match pending.collector.resolve(reply)? {
            Some(queue) => execute(&pending.translated, pending.body_start_line, queue, &self.config),
            None => ExecutionResult::cancelled(),
        };
        tracing::debug!(status = ?result.status, "run finished");
        Ok(result)
    }
}

/// Validates, translates and runs `source`, answering any input request
/// through `provider`.
pub fn run_to_completion(
    source: &str,
    filename: &str,
    config: &RunConfig,
    provider: &mut dyn InputProvider,
) -> ExecutionResult {
    let mut session = Session::new(config.clone());
    match session.run(source, filename) {
        RunStep::Finished(result) => result,
        RunStep::NeedsInput(request) => {
            let reply = provider.provide(&request);
            match session.submit_input(reply) {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(%err, "input reply rejected");
                    ExecutionResult::cancelled()
                }
            }
        }
    }
}

/// Lexes, parses and evaluates translated statements against a fresh
/// context. Faults become a single runtime problem on the source line.
pub fn execute(translated: &str, body_start_line: usize, input: InputQueue, config: &RunConfig) -> ExecutionResult {
    let mut ctx = RunContext::new(config, input);

    let outcome = interpret(translated, &mut ctx);
    let result = match outcome {
        Ok(()) => ctx.output.into_success(),
        Err(error) => {
            let line = body_start_line + line_of(translated, error.span.start) - 1;
            tracing::debug!(line, kind = ?error.kind, message = %error.message, "runtime fault");
            ctx.output.into_runtime_error(ValidationIssue::at_line(line, error.message))
        }
    };
    tracing::debug!(status = ?result.status, lines = result.console_lines.len(), "execution complete");
    result
}

fn interpret(translated: &str, ctx: &mut RunContext) -> Result<(), SimError> {
    let program = parse_translated(translated)?;
    Evaluator::new(ctx).evaluate_program(&program)
}

/// Lexes and parses host statements without running them.
pub fn parse_translated(translated: &str) -> Result<Program, SimError> {
    let tokens = Lexer::new(translated.to_string()).scan_tokens()?;
    Parser::new(tokens).parse()
}
