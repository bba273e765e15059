//! Line-oriented shell.
//!
//! Reads command lines, routes them through the parser and dispatcher and
//! prints results. Interactive sessions report a failed command and carry on;
//! batch runs (`--command`, `--script`) stop at the first failure so the
//! process can exit with that error's code.

use crate::commands::{Command, CommandDispatcher, CommandOutput, CommandRouter};
use crate::error::{LensError, Result};
use crate::session::Session;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Prompt shown before each interactive line.
pub const PROMPT: &str = "schemalens> ";

/// What happened to one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line or comment.
    Skipped,
    /// The command ran.
    Done(CommandOutput),
    /// The command ended the session.
    Exit,
}

/// A session plus the dispatcher that drives it.
pub struct Shell {
    dispatcher: CommandDispatcher,
    session: Session,
    finished: bool,
}

impl Shell {
    pub fn new(dispatcher: CommandDispatcher, session: Session) -> Self {
        Self {
            dispatcher,
            session,
            finished: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns true once `exit` ran.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Parses and dispatches one line. Blank lines and `#` comments are skipped.
    pub async fn execute_line(&mut self, line: &str) -> Result<LineOutcome> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(LineOutcome::Skipped);
        }

        debug!("> {}", line);
        let command = CommandRouter::parse(line)?;
        let output = self.dispatcher.dispatch(&mut self.session, command).await?;

        if output.is_exit() {
            self.finished = true;
            return Ok(LineOutcome::Exit);
        }
        Ok(LineOutcome::Done(output))
    }

    /// Runs `lines` in order, stopping at the first failure.
    ///
    /// A failed command is reported on `err` as `<command>: <error>` and
    /// returned. The connection is closed however the run ends.
    pub async fn run_batch<I, S>(&mut self, lines: I, out: &mut dyn Write, err: &mut dyn Write) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let result = self.batch_lines(lines, out, err).await;
        self.finish().await;
        result
    }

    async fn batch_lines<I, S>(&mut self, lines: I, out: &mut dyn Write, err: &mut dyn Write) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            let line = line.as_ref();
            match self.execute_line(line).await {
                Ok(LineOutcome::Exit) => return Ok(()),
                Ok(outcome) => print_outcome(&outcome, out)?,
                Err(e) => {
                    report(line, &e, err);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Runs an interactive session over `input` until `exit` or end of input.
    ///
    /// Failed commands are reported and the session continues. The
    /// connection is closed however the session ends.
    pub async fn run_interactive(
        &mut self,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        let result = self.interactive_lines(input, out, err).await;
        self.finish().await;
        result
    }

    async fn interactive_lines(
        &mut self,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        let mut line = String::new();
        loop {
            write_out(out, PROMPT)?;
            line.clear();
            let read = input
                .read_line(&mut line)
                .map_err(|e| LensError::internal(format!("Failed to read input: {e}")))?;
            if read == 0 {
                return write_out(out, "\n");
            }

            match self.execute_line(&line).await {
                Ok(LineOutcome::Exit) => return Ok(()),
                Ok(outcome) => print_outcome(&outcome, out)?,
                Err(e) => report(&line, &e, err),
            }
        }
    }

    /// Closes the connection if the session is still connected.
    pub async fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if self.session.is_connected() {
            if let Err(e) = self.dispatcher.dispatch(&mut self.session, Command::Exit).await {
                warn!("Error closing session: {}", e);
            }
        }
    }
}

fn print_outcome(outcome: &LineOutcome, out: &mut dyn Write) -> Result<()> {
    if let LineOutcome::Done(output) = outcome {
        let text = output.to_string();
        if !text.is_empty() {
            write_out(out, &format!("{text}\n"))?;
        }
    }
    Ok(())
}

fn write_out(out: &mut dyn Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| LensError::sink("<stdout>", e))
}

/// Writes `<command>: <error>` for a failed line.
fn report(line: &str, error: &LensError, err: &mut dyn Write) {
    let keyword = line.split_whitespace().next().unwrap_or_default();
    warn!("{}: {}", keyword, error);
    // Nowhere left to report a failing error stream.
    let _ = writeln!(err, "{keyword}: {error}");
}

/// Reads script lines from a file, or from stdin when `path` is "-".
pub fn load_script(path: &str) -> Result<Vec<String>> {
    let content = if path == "-" {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| LensError::config(format!("Failed to read stdin: {e}")))?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| LensError::config(format!("Failed to read script file {path}: {e}")))?
    };
    Ok(content.lines().map(String::from).collect())
}
