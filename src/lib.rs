// javasim library
//
// Offline "compile and run" for single-file Java programs: structural
// validation, entry body extraction, translation to host statements and a
// sandboxed interpreter backed by a small Java standard library shim.

// Public modules
pub mod ast;
pub mod config;
pub mod dialog;
pub mod error;
pub mod evaluator;
pub mod extract;
pub mod format;
pub mod input;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod runner;
pub mod segment;
pub mod shim;
pub mod translate;
pub mod validate;
pub mod value;

// Re-export commonly used items
pub use config::RunConfig;
pub use error::{SimError, Span, ValidationIssue};
pub use format::format_source;
pub use input::{InputProvider, InputReply, InputRequest, InputResponse, QueuedInput};
pub use output::{ExecutionResult, RunStatus};
pub use runner::{run_to_completion, RunStep, Session, SessionError};
pub use translate::translate;
pub use validate::validate;
pub use value::Value;
