//! Reading player commands from the terminal.
//!
//! An interactive terminal gets a line editor with history kept under the
//! user's data directory. Piped input, or an editor that fails, is read
//! line by line from stdin.

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::style::DialogStyle;

/// Outcome of reading a line from the player.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

impl InputEvent {
    /// Fold an editor result into an event; Ctrl-C and Ctrl-D are events, not errors.
    fn from_readline(result: Result<String, ReadlineError>) -> io::Result<Self> {
        match result {
            Ok(line) => Ok(Self::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Self::Interrupted),
            Err(ReadlineError::Eof) => Ok(Self::Eof),
            Err(ReadlineError::Io(err)) => Err(err),
            Err(other) => Err(io::Error::other(other)),
        }
    }
}

/// Source of player input for one console session.
pub struct InputManager {
    /// `None` once we are reading plain stdin.
    editor: Option<HistoryEditor>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        if !io::stdin().is_terminal() {
            info!("stdin is not a terminal, reading plain lines");
            return Self { editor: None };
        }
        match HistoryEditor::open(history_file_path()) {
            Ok(editor) => Self { editor: Some(editor) },
            Err(err) => {
                warn!("line editor unavailable ({err}), reading plain lines");
                Self { editor: None }
            },
        }
    }

    /// Read one line. An editor failure drops to plain stdin for this and every later read.
    ///
    /// # Errors
    /// I/O failures while reading plain stdin.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        if let Some(editor) = self.editor.as_mut() {
            match editor.read_line(prompt) {
                Ok(event) => return Ok(event),
                Err(err) => {
                    warn!("line editor failed: {err}; reading plain lines from now on");
                    self.editor = None;
                },
            }
        }
        read_plain_line(&mut io::stdin().lock(), prompt)
    }
}

struct HistoryEditor {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl HistoryEditor {
    fn open(history: Option<PathBuf>) -> io::Result<Self> {
        let mut editor = DefaultEditor::new().map_err(|err| match err {
            ReadlineError::Io(err) => err,
            other => io::Error::other(other),
        })?;

        if let Some(path) = history.as_deref() {
            if let Some(dir) = path.parent()
                && let Err(err) = fs::create_dir_all(dir)
            {
                warn!("cannot create history directory {}: {err}", dir.display());
            }
            match editor.load_history(path) {
                Ok(()) => debug!("loaded history from {}", path.display()),
                Err(ReadlineError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {},
                Err(err) => warn!("cannot load history from {}: {err}", path.display()),
            }
        }

        Ok(Self { editor, history })
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        let event = InputEvent::from_readline(self.editor.readline(prompt))?;
        if let InputEvent::Line(line) = &event {
            self.remember(line);
        }
        Ok(event)
    }

    /// Blank lines only advance the dialogue, so they stay out of history.
    fn remember(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if let Err(err) = self.editor.add_history_entry(line) {
            warn!("cannot record history entry: {err}");
        }
        if let Some(path) = self.history.as_deref()
            && let Err(err) = self.editor.save_history(path)
        {
            warn!("cannot save history to {}: {err}", path.display());
        }
    }
}

fn read_plain_line(reader: &mut impl BufRead, prompt: &str) -> io::Result<InputEvent> {
    print!("{}", prompt.prompt_style());
    io::stdout().flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(InputEvent::Eof);
    }
    Ok(InputEvent::Line(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| history_under(&base))
}

fn history_under(base: &Path) -> PathBuf {
    base.join("palaver").join("history.txt")
}
