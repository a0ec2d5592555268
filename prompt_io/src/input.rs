use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use thiserror::Error;

/// The input stream ended or was interrupted by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("input closed")]
pub struct InputClosed;

/// Returns true if `err` was caused by the input stream closing.
pub fn is_input_closed(err: &anyhow::Error) -> bool {
    err.is::<InputClosed>()
}

/// Source of interactive input lines.
pub trait LineSource {
    /// Show `prompt` and read one line, without its trailing newline.
    ///
    /// Returns [`InputClosed`] (wrapped in `anyhow::Error`) on end of input or
    /// interrupt.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Terminal input through a `rustyline` editor with in-memory history.
pub struct EditorInput {
    editor: DefaultEditor,
}

impl EditorInput {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|err| anyhow::anyhow!("failed to start line editor: {err}"))?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor
                        .add_history_entry(line.as_str())
                        .map_err(|err| anyhow::anyhow!("failed to record history: {err}"))?;
                }
                Ok(line)
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Err(InputClosed.into()),
            Err(err) => Err(anyhow::anyhow!("failed to read line: {err}")),
        }
    }
}

/// Plain buffered input, used when stdin is not a terminal.
///
/// Prompts are written to `prompt_out` so transcripts look the same as an
/// interactive session.
pub struct PipedInput<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PipedInput<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl PipedInput<StdinLock<'static>, Stdout> {
    /// Read from the process stdin and prompt on stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineSource for PipedInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.prompt_out, "{prompt}")?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("failed to read from input")?;
        if read == 0 {
            return Err(InputClosed.into());
        }

        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }
}

/// Replays a fixed list of lines, then reports [`InputClosed`].
///
/// Every prompt shown is recorded and can be inspected with [`ScriptedInput::prompts`].
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Number of lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front().ok_or_else(|| InputClosed.into())
    }
}
