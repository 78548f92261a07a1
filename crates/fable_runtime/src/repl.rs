//! Interactive read-eval-print loop.
//!
//! Input lines are whitespace-separated words: a verb, then up to two
//! entity ids (direct and indirect object). Lines starting with `:` are
//! meta-commands handled by the REPL itself rather than dispatched.

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::session::Session;
use fable_foundation::{Command, Error, HandlerResult, Result, UpdateResult};
use std::io::Write;

/// Meta-commands the REPL understands, for completion.
const META_COMMANDS: &[&str] = &[":help", ":turn", ":trace", ":entities", ":seed", ":quit"];

/// Filler words stripped from commands before dispatch.
const FILLER_WORDS: &[&str] = &["a", "an", "the", "with", "to", "at"];

/// Interactive read-eval-print loop over a [`Session`].
pub struct Repl<E: LineEditor = RustylineEditor> {
    editor: E,
    session: Session,
    show_banner: bool,
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL over the given session with a rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(session: Session) -> Result<Self> {
        Ok(Self::with_editor(session, RustylineEditor::new()?))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL with a custom line editor.
    pub fn with_editor(session: Session, editor: E) -> Self {
        let mut repl = Self {
            editor,
            session,
            show_banner: true,
            prompt: "> ".to_string(),
        };
        repl.sync_keywords();
        repl
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the prompt string.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs the REPL until EOF or `:quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails. Gameplay and
    /// session errors are printed and the loop continues.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => self.print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Reads and evaluates one line. Returns `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let line = match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => return Ok(true),
            ReadResult::Eof => return Ok(false),
        };

        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }
        self.editor.add_history(line);

        if line.starts_with(':') {
            return self.eval_meta(line);
        }

        let command = parse_command(line);
        let result = self.session.execute(&command)?;
        self.print_result(&result);
        Ok(true)
    }

    /// Handles a `:` meta-command. Returns `Ok(false)` to exit.
    fn eval_meta(&mut self, line: &str) -> Result<bool> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or(line);
        match name {
            ":quit" | ":q" => Ok(false),
            ":help" | ":h" => {
                self.print_help();
                Ok(true)
            }
            ":turn" | ":t" => {
                let report = self.session.run_turn()?;
                println!("\x1b[2m{report}\x1b[0m");
                Ok(true)
            }
            ":trace" => {
                let count = parts.next().and_then(|n| n.parse().ok()).unwrap_or(20);
                for event in self.session.trace().recent(count) {
                    println!("\x1b[2m{event}\x1b[0m");
                }
                Ok(true)
            }
            ":entities" => {
                let mut ids: Vec<String> = self
                    .session
                    .world()
                    .entities()
                    .map(|entity| entity.id().to_string())
                    .collect();
                ids.sort();
                for id in ids {
                    println!("  {id}");
                }
                Ok(true)
            }
            ":seed" => {
                println!("{}", self.session.world().seed());
                Ok(true)
            }
            other => {
                println!("Unknown meta-command: {other} (try :help)");
                Ok(true)
            }
        }
    }

    /// Feeds the merged vocabulary and meta-commands to the completer.
    fn sync_keywords(&mut self) {
        let mut keywords: Vec<String> = self
            .session
            .registry()
            .vocabulary()
            .words()
            .map(|word| word.to_string())
            .collect();
        keywords.extend(META_COMMANDS.iter().map(|cmd| (*cmd).to_string()));
        keywords.sort();
        self.editor.set_keywords(keywords);
    }

    /// Prints a handler result as narration.
    #[allow(clippy::unused_self)]
    fn print_result(&self, result: &HandlerResult) {
        // Players get a generic line when the world halts; :trace holds the detail.
        let halted = result
            .message
            .as_deref()
            .is_some_and(|message| message.starts_with(UpdateResult::INCONSISTENT_STATE_MARKER));
        if halted {
            println!("\x1b[31mThe world cannot continue safely. See :trace for details.\x1b[0m");
            return;
        }
        match &result.message {
            Some(message) if result.success => println!("{message}"),
            Some(message) => println!("\x1b[33m{message}\x1b[0m"),
            None if result.success => println!("Done."),
            None => println!("\x1b[33mNothing happens.\x1b[0m"),
        }
    }

    /// Prints an error in red to stderr.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!(
            "\x1b[1;36m{}\x1b[0m",
            r"  __       _     _
 / _| __ _| |__ | | ___
| |_ / _` | '_ \| |/ _ \
|  _| (_| | |_) | |  __/
|_|  \__,_|_.__/|_|\___|"
        );
        println!("\x1b[1mFable\x1b[0m {} - an extensible fiction core", env!("CARGO_PKG_VERSION"));
        println!("Type a verb and an entity id (try \x1b[1mlook\x1b[0m), :help for meta-commands, Ctrl+D to exit.\n");
        let _ = std::io::stdout().flush();
    }

    /// Prints meta-command help.
    #[allow(clippy::unused_self)]
    fn print_help(&self) {
        println!(
            "Commands are whitespace-separated words: a verb, then entity ids.
    look             describe where you are
    take lamp        pick something up
    drop lamp        put it down

\x1b[1mMeta-commands:\x1b[0m
    :help            show this help
    :turn            advance the world one turn
    :trace [N]       show the last N trace events (default 20)
    :entities        list entity ids
    :seed            show the world seed
    :quit            exit (also Ctrl+D)"
        );
    }
}

/// Splits a line into a command: verb, then direct and indirect object.
///
/// Articles and common prepositions are dropped, so `take the lamp` and
/// `take lamp` dispatch the same command. The actor is always `player`.
fn parse_command(line: &str) -> Command {
    let mut words = line
        .split_whitespace()
        .filter(|word| !FILLER_WORDS.contains(word));
    let verb = words.next().unwrap_or_default();
    let mut command = Command::new(verb, "player");
    if let Some(object) = words.next() {
        command = command.with_object(object);
    }
    if let Some(indirect) = words.next() {
        command = command.with_indirect_object(indirect);
    }
    command
}

// =================================================================
// Tests
// =================================================================
