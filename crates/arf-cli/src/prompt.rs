//! Line-based interactive prompts. End of input counts as cancellation.

use crate::errors::CliError;
use std::io::{self, BufRead, Write};

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line of text.
    pub fn say(&mut self, text: &str) -> Result<(), CliError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Read one trimmed line; `default` is used for an empty answer.
    pub fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String, CliError> {
        match default {
            Some(d) if !d.is_empty() => write!(self.output, "{} [{}]: ", question, d)?,
            _ => write!(self.output, "{}: ", question)?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(CliError::Cancelled);
        }
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(default.unwrap_or_default().to_string());
        }
        Ok(answer.to_string())
    }

    /// Yes/no question.
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool, CliError> {
        let hint = if default { "Y/n" } else { "y/N" };
        let answer = self.ask(&format!("{} ({})", question, hint), None)?;
        Ok(match answer.to_lowercase().as_str() {
            "" => default,
            "y" | "yes" | "true" => true,
            _ => false,
        })
    }

    /// Ask until `accept` returns `Ok`; its error text is shown before retrying.
    pub fn ask_until<T>(
        &mut self,
        question: &str,
        default: Option<&str>,
        mut accept: impl FnMut(&str) -> Result<T, String>,
    ) -> Result<T, CliError> {
        loop {
            let answer = self.ask(question, default)?;
            match accept(&answer) {
                Ok(value) => return Ok(value),
                Err(message) => self.say(&format!("  {}", message))?,
            }
        }
    }
}
