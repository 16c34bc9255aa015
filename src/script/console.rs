//! Console sinks
//!
//! `console.log(a, b, c)` joins its arguments with single spaces and writes
//! one line. Where the line ends up is the sink's business.

use std::cell::RefCell;

use tracing::info;

use crate::runtime::value::ScriptValue;

/// Receives `console.log` calls.
pub trait Console {
    fn log(
        &self,
        args: &[ScriptValue],
    );
}

/// Render a log call the way every sink prints it.
pub fn format_line(args: &[ScriptValue]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn log(
        &self,
        args: &[ScriptValue],
    ) {
        println!("{}", format_line(args));
    }
}

/// Emits lines as `tracing` events on the `console` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl Console for TracingConsole {
    fn log(
        &self,
        args: &[ScriptValue],
    ) {
        info!(target: "console", "{}", format_line(args));
    }
}

/// Keeps lines in memory.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    lines: RefCell<Vec<String>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines logged so far, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Console for RecordingConsole {
    fn log(
        &self,
        args: &[ScriptValue],
    ) {
        self.lines.borrow_mut().push(format_line(args));
    }
}
