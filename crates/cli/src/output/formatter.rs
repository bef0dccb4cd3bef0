//! Message rendering for osc
//!
//! Results go to stdout, diagnostics to stderr. `get` writes object bytes
//! to stdout, so its formatter is built with [`Formatter::reserve_stdout`]
//! and every message moves to stderr.

use serde::Serialize;

use super::OutputConfig;

/// Kind of one-line status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Done,
    Warn,
    Failed,
}

impl Status {
    fn marker(self) -> &'static str {
        match self {
            Status::Done => "✓",
            Status::Warn => "⚠",
            Status::Failed => "✗",
        }
    }

    /// ANSI SGR colour code
    fn color(self) -> u8 {
        match self {
            Status::Done => 32,
            Status::Warn => 33,
            Status::Failed => 31,
        }
    }
}

/// Writes command output according to the global output flags
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: OutputConfig,
    stdout_reserved: bool,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            stdout_reserved: false,
        }
    }

    /// Route all messages to stderr, leaving stdout for raw data
    pub fn reserve_stdout(mut self) -> Self {
        self.stdout_reserved = true;
        self
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    fn colored(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    fn render(&self, status: Status, message: &str) -> String {
        if self.colored() {
            format!("\x1b[{}m{}\x1b[0m {message}", status.color(), status.marker())
        } else {
            format!("{} {message}", status.marker())
        }
    }

    /// Write a result line to stdout, or stderr when stdout is reserved
    fn emit(&self, line: &str) {
        if self.stdout_reserved {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Confirmation for a finished operation; silent in quiet and JSON modes
    pub fn success(&self, message: &str) {
        if !self.config.quiet && !self.config.json {
            self.emit(&self.render(Status::Done, message));
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.config.quiet && !self.config.json {
            eprintln!("{}", self.render(Status::Warn, message));
        }
    }

    /// Errors always reach stderr, quiet or not
    pub fn error(&self, message: &str) {
        if self.config.json {
            eprintln!("{}", error_json(message));
        } else {
            eprintln!("{}", self.render(Status::Failed, message));
        }
    }

    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => self.emit(&json),
            Err(e) => self.error(&format!("Failed to serialize output: {e}")),
        }
    }

    /// Plain result line, such as a listed key
    pub fn println(&self, message: &str) {
        if !self.config.quiet {
            self.emit(message);
        }
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
