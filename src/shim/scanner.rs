use super::{arity, RunContext, ShimError};
use crate::value::Value;

/// Tokens collected before the run, consumed in order by scanner reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputQueue {
    tokens: Vec<String>,
    cursor: usize,
}

impl InputQueue {
    /// Flattens every provided value on whitespace.
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let tokens = values
            .iter()
            .flat_map(|value| value.as_ref().split_whitespace())
            .map(str::to_string)
            .collect();
        Self { tokens, cursor: 0 }
    }

    pub fn next_token(&mut self) -> Option<String> {
        let token = self.tokens.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(token)
    }

    pub fn peek(&self) -> Option<&str> {
        self.tokens.get(self.cursor).map(String::as_str)
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }
}

/// Next token for a read; shows it on the console when echo is on.
fn consume(ctx: &mut RunContext) -> String {
    let token = ctx.input.next_token().unwrap_or_default();
    if ctx.echo_input {
        ctx.output.println(&token);
    }
    token
}

pub fn scanner_method(ctx: &mut RunContext, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    arity(method, args, 0..=0)?;
    let value = match method {
        "nextLine" | "next" => Value::String(consume(ctx)),
        "nextInt" | "nextLong" | "nextShort" | "nextByte" => {
            Value::Int(consume(ctx).parse::<i64>().unwrap_or(0))
        }
        "nextDouble" | "nextFloat" => Value::Double(consume(ctx).parse::<f64>().unwrap_or(0.0)),
        "nextBoolean" => Value::Bool(consume(ctx).eq_ignore_ascii_case("true")),
        "hasNext" | "hasNextLine" => Value::Bool(ctx.input.peek().is_some()),
        "hasNextInt" => Value::Bool(ctx.input.peek().is_some_and(|t| t.parse::<i64>().is_ok())),
        "hasNextDouble" => Value::Bool(ctx.input.peek().is_some_and(|t| t.parse::<f64>().is_ok())),
        "close" => Value::Null,
        _ => return Err(ShimError::unknown_method("Scanner", method)),
    };
    tracing::trace!(method, remaining = ctx.input.remaining(), "scanner read");
    Ok(value)
}
