//! Line-based terminal prompts.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Asks one question per line and reads one trimmed answer per line.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question`, read a line, print a blank line. End of input
    /// reads as an empty answer.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        writeln!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;

        writeln!(self.output)?;
        Ok(line.trim().to_owned())
    }
}
