use crate::input::{InputProvider, InputReply, InputRequest, InputResponse};
use std::io::{self, BufRead, Write};

/// Asks for each prompt on the terminal. Blank answers are asked again;
/// end of input cancels the run.
pub struct TerminalDialog<R, W> {
    reader: R,
    writer: W,
}

impl TerminalDialog<io::StdinLock<'static>, io::Stderr> {
    /// Reads stdin and writes prompts to stderr, so stdout carries only the
    /// program's console.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalDialog<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            write!(self.writer, "{} ", prompt)?;
            self.writer.flush()?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                writeln!(self.writer)?;
                return Ok(None);
            }

            let answer = line.trim();
            if !answer.is_empty() {
                return Ok(Some(answer.to_string()));
            }
            writeln!(self.writer, "Please fill out the '{}' field.", prompt)?;
        }
    }
}

impl<R: BufRead, W: Write> InputProvider for TerminalDialog<R, W> {
    fn provide(&mut self, request: &InputRequest) -> InputReply {
        let mut values = Vec::with_capacity(request.prompts.len());
        for prompt in &request.prompts {
            match self.ask(prompt) {
                Ok(Some(value)) => values.push(value),
                Ok(None) => return InputReply::Cancelled,
                Err(error) => {
                    tracing::warn!(%error, "input dialog failed");
                    return InputReply::Cancelled;
                }
            }
        }
        InputReply::Provided(InputResponse { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompts: &[&str]) -> InputRequest {
        InputRequest {
            prompts: prompts.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn blank_answers_are_asked_again() {
        let mut output = Vec::new();
        let reply = TerminalDialog::new("\n  \nAlice\n30\n".as_bytes(), &mut output)
            .provide(&request(&["Enter your name:", "Enter your age:"]));

        assert_eq!(reply, InputReply::values(["Alice", "30"]));
        let shown = String::from_utf8(output).expect("utf8");
        assert_eq!(shown.matches("Please fill out the 'Enter your name:' field.").count(), 2);
    }

    #[test]
    fn end_of_input_cancels() {
        let mut output = Vec::new();
        let reply = TerminalDialog::new("Alice\n".as_bytes(), &mut output)
            .provide(&request(&["Name:", "Age:"]));
        assert_eq!(reply, InputReply::Cancelled);
    }
}
