//! Line editor abstraction for the REPL.
//!
//! This module provides a trait-based abstraction over line editing
//! libraries, allowing the REPL to use rustyline while remaining swappable.

use fable_foundation::{Error, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator};
use std::borrow::Cow;

/// Result of reading a line from the editor.
#[derive(Debug)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing functionality.
///
/// This trait allows swapping out the underlying line editor implementation
/// (e.g., from rustyline to reedline) without changing the REPL code.
pub trait LineEditor {
    /// Read a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Add a line to history.
    fn add_history(&mut self, line: &str);

    /// Set available completions for verbs and meta-commands.
    fn set_keywords(&mut self, keywords: Vec<String>);
}

/// Helper for rustyline that provides completion, hints, and highlighting.
#[derive(Helper, Completer, Hinter, Validator)]
struct FableHelper {
    #[rustyline(Completer)]
    completer: FableCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
}

impl Highlighter for FableHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        let verb_len = rest
            .find(char::is_whitespace)
            .unwrap_or(rest.len());
        if verb_len == 0 {
            return Cow::Borrowed(line);
        }

        let verb = &rest[..verb_len];
        let color = if verb.starts_with(':') {
            "\x1b[35m" // magenta for meta-commands
        } else if self.completer.keywords.iter().any(|kw| kw == verb) {
            "\x1b[1;36m" // bold cyan for known verbs
        } else {
            return Cow::Borrowed(line);
        };

        let mut result = String::with_capacity(line.len() + 16);
        result.push_str(&line[..indent]);
        result.push_str(color);
        result.push_str(verb);
        result.push_str("\x1b[0m");
        result.push_str(&rest[verb_len..]);
        Cow::Owned(result)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

/// Completer for verb words and meta-commands.
///
/// Commands are single lines of whitespace-separated words, so only the
/// first word completes. Later words name entities, which the editor
/// does not know about.
struct FableCompleter {
    keywords: Vec<String>,
}

impl FableCompleter {
    fn new() -> Self {
        Self {
            keywords: Self::default_keywords(),
        }
    }

    fn default_keywords() -> Vec<String> {
        vec![
            ":help".into(),
            ":turn".into(),
            ":trace".into(),
            ":entities".into(),
            ":seed".into(),
            ":quit".into(),
        ]
    }
}

impl Completer for FableCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(char::is_whitespace)
            .map_or(0, |i| i + 1);

        // Only the verb position completes.
        if line[..start].trim().is_empty() {
            let word = &line[start..pos];
            let candidates: Vec<Pair> = self
                .keywords
                .iter()
                .filter(|kw| kw.starts_with(word))
                .map(|kw| Pair {
                    display: kw.clone(),
                    replacement: kw.clone(),
                })
                .collect();
            Ok((start, candidates))
        } else {
            Ok((pos, Vec::new()))
        }
    }
}

/// Line editor implementation using rustyline.
pub struct RustylineEditor {
    editor: Editor<FableHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a new rustyline-based editor.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline initialization fails.
    ///
    /// # Panics
    ///
    /// Panics if the history size configuration is invalid (should not happen
    /// with hardcoded valid values).
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(1000)
            .expect("valid history size")
            .build();

        let helper = FableHelper {
            completer: FableCompleter::new(),
            hinter: HistoryHinter::new(),
        };

        let mut editor =
            Editor::with_config(config).map_err(|e| Error::internal(e.to_string()))?;
        editor.set_helper(Some(helper));

        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::internal(e.to_string())),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    fn set_keywords(&mut self, keywords: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer.keywords = keywords;
        }
    }
}
