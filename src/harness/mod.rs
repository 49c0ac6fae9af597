//! harness
//!
//! Line-oriented command interpreter that drives a [`QueueSlot`].
//!
//! # Responsibilities
//!
//! - Parse script lines into [`Command`]s
//! - Run each command against the queue and print what happened
//! - Verify queue invariants after every mutating command
//! - Count reported errors and stop once the error limit is reached
//!
//! # Errors vs. warnings
//!
//! An operation that fails the way its contract says it should (removing
//! from an empty queue, inserting with no queue) is a warning. A result
//! that contradicts an expectation in the script, an allocation failure,
//! a broken invariant, or an unparseable line is an error and counts
//! toward the limit.
//!
//! # Example
//!
//! ```
//! use strq::harness::{Options, Session};
//! use strq::ui::output::Verbosity;
//!
//! let script = "new\nit a\nit b\nih c\nsize 3\nrh c\nreverse\nrh b\n";
//! let mut out = Vec::new();
//! let mut session = Session::new(Options::default(), &mut out, Verbosity::Normal);
//! let summary = session.run(script.as_bytes()).unwrap();
//!
//! assert_eq!(summary.errors, 0);
//! assert_eq!(summary.final_size, Some(1));
//! ```

pub mod script;

pub use script::{parse_line, Command, ScriptError, HELP, MAX_REPEAT};

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use serde::Serialize;

use crate::core::config::{
    check_bufsize, Config, DEFAULT_BUFSIZE, DEFAULT_ERROR_LIMIT, MAX_BUFSIZE,
};
use crate::queue::{QueueError, QueueSlot};
use crate::ui::output::{self, Verbosity};

/// Run-time harness options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Capacity of the removal buffer, terminator included.
    pub bufsize: usize,
    /// Errors tolerated before the run stops. Always at least 1.
    pub error_limit: usize,
    /// Echo each command before running it.
    pub echo: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bufsize: DEFAULT_BUFSIZE,
            error_limit: DEFAULT_ERROR_LIMIT,
            echo: false,
        }
    }
}

impl From<&Config> for Options {
    fn from(config: &Config) -> Self {
        Self {
            bufsize: config.bufsize(),
            error_limit: config.error_limit(),
            echo: config.echo(),
        }
    }
}

/// Outcome of a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Non-blank lines processed.
    pub commands: usize,
    /// Errors reported.
    pub errors: usize,
    /// Queue size at the end, `None` if no queue exists.
    pub final_size: Option<usize>,
    /// Whether the error limit cut the run short.
    pub stopped_early: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
    Abort,
}

/// An interpreter session owning one queue slot.
pub struct Session<W: Write> {
    slot: QueueSlot,
    options: Options,
    out: W,
    verbosity: Verbosity,
    commands: usize,
    errors: usize,
}

impl<W: Write> Session<W> {
    /// Create a session with no queue. Scripts start with `new`.
    pub fn new(options: Options, out: W, verbosity: Verbosity) -> Self {
        Self {
            slot: QueueSlot::absent(),
            options,
            out,
            verbosity,
            commands: 0,
            errors: 0,
        }
    }

    pub fn slot(&self) -> &QueueSlot {
        &self.slot
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Run every line of `input` until EOF, `quit`, or the error limit.
    ///
    /// # Errors
    ///
    /// Only I/O failures reading `input` or writing output are returned;
    /// script problems are reported in the output and counted.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<RunSummary> {
        let mut stopped_early = false;
        for line in input.lines() {
            match self.execute_line(&line?)? {
                Flow::Continue => {}
                Flow::Quit => break,
                Flow::Abort => {
                    stopped_early = true;
                    break;
                }
            }
        }
        self.out.flush()?;

        Ok(RunSummary {
            commands: self.commands,
            errors: self.errors,
            final_size: self.slot.get().map(|q| q.size()),
            stopped_early,
        })
    }

    fn execute_line(&mut self, line: &str) -> io::Result<Flow> {
        let Some(parsed) = parse_line(line).transpose() else {
            return Ok(Flow::Continue);
        };
        self.commands += 1;
        if self.options.echo {
            self.say(format_args!("cmd> {}", line.trim()))?;
        }
        let command = match parsed {
            Ok(command) => command,
            Err(e) => return self.report_error(e),
        };

        output::debug(format_args!("executing {:?}", command), self.verbosity);
        let mutating = command.is_mutating();
        let flow = self.execute(command)?;

        if flow == Flow::Continue && mutating {
            if let Err(violation) = self.slot.verify() {
                return self.report_error(format!("invariant violated: {}", violation));
            }
        }
        Ok(flow)
    }

    fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::New => {
                if self.slot.is_present() {
                    output::debug("replacing existing queue", self.verbosity);
                }
                self.slot.create();
                self.show()
            }
            Command::Free => {
                if !self.slot.destroy() {
                    self.warn("no queue to free")?;
                }
                self.show()
            }
            Command::InsertHead { value, count } => self.insert(&value, count, true),
            Command::InsertTail { value, count } => self.insert(&value, count, false),
            Command::RemoveHead { expected } => self.remove(expected.as_deref()),
            Command::RemoveHeadQuiet => match self.slot.remove_front(None) {
                Ok(_) => self.show(),
                Err(e) => self.operation_failed("remove head", e),
            },
            Command::Size { expected } => {
                let size = self.slot.size();
                if !self.slot.is_present() {
                    self.warn("size of missing queue reported as 0")?;
                }
                self.say(format_args!("Queue size = {}", size))?;
                match expected {
                    Some(n) if n != size => self.report_error(format!(
                        "Computed queue size as {}, but expected {}",
                        size, n
                    )),
                    _ => Ok(Flow::Continue),
                }
            }
            Command::Reverse => {
                if !self.slot.is_present() {
                    self.warn("no queue to reverse")?;
                }
                self.slot.reverse();
                self.show()
            }
            Command::Show => self.show(),
            Command::SetOption { name, value } => self.set_option(&name, &value),
            Command::Help => {
                for (synopsis, description) in HELP {
                    self.say(format_args!("{:<16} | {}", synopsis, description))?;
                }
                Ok(Flow::Continue)
            }
            Command::Quit => Ok(Flow::Quit),
        }
    }

    fn insert(&mut self, value: &str, count: usize, at_head: bool) -> io::Result<Flow> {
        let operation = if at_head { "insert head" } else { "insert tail" };
        for _ in 0..count {
            let result = if at_head {
                self.slot.insert_front(value)
            } else {
                self.slot.insert_back(value)
            };
            if let Err(e) = result {
                return self.operation_failed(operation, e);
            }
        }
        self.show()
    }

    fn remove(&mut self, expected: Option<&str>) -> io::Result<Flow> {
        let mut buf = Vec::new();
        if buf.try_reserve_exact(self.options.bufsize).is_err() {
            return self.report_error(format!(
                "cannot allocate a {} byte removal buffer",
                self.options.bufsize
            ));
        }
        buf.resize(self.options.bufsize, 0);
        let copied = match self.slot.remove_front(Some(&mut buf[..])) {
            Ok(copied) => copied,
            Err(e) => return self.operation_failed("remove head", e),
        };
        let removed = &buf[..copied];
        self.say(format_args!(
            "Removed {} from queue",
            output::format_payload(removed)
        ))?;

        if let Some(expected) = expected {
            // Compare only what fits in the buffer.
            let limit = self.options.bufsize.saturating_sub(1);
            let expected = expected.as_bytes();
            let expected = &expected[..expected.len().min(limit)];
            if removed != expected {
                let message = format!(
                    "Removed value {} != expected value {}",
                    output::format_payload(removed),
                    output::format_payload(expected)
                );
                return self.report_error(message);
            }
        }
        self.show()
    }

    fn set_option(&mut self, name: &str, value: &str) -> io::Result<Flow> {
        let applied = match name {
            "bufsize" => script::parse_number(value)
                .and_then(|n| {
                    check_bufsize(n).map_err(|_| ScriptError::OutOfRange {
                        value: value.to_string(),
                        min: 1,
                        max: MAX_BUFSIZE,
                    })
                })
                .map(|n| self.options.bufsize = n),
            "error_limit" => script::parse_number(value)
                .and_then(|n| match n {
                    0 => Err(ScriptError::InvalidValue(value.to_string())),
                    n => Ok(n),
                })
                .map(|n| self.options.error_limit = n),
            "echo" => script::parse_switch(value).map(|on| self.options.echo = on),
            _ => return self.report_error(format!("unknown option '{}'", name)),
        };

        match applied {
            Ok(()) => {
                output::debug(format_args!("option {} = {}", name, value), self.verbosity);
                Ok(Flow::Continue)
            }
            Err(e) => self.report_error(format!("option {}: {}", name, e)),
        }
    }

    fn operation_failed(&mut self, operation: &str, err: QueueError) -> io::Result<Flow> {
        match err {
            QueueError::AllocationFailure { .. } => {
                self.report_error(format!("{} failed: {}", operation, err))
            }
            QueueError::Empty | QueueError::NoQueue => {
                self.warn(format_args!("{} failed: {}", operation, err))?;
                self.show()
            }
        }
    }

    fn show(&mut self) -> io::Result<Flow> {
        let rendered = output::format_queue(self.slot.get());
        self.say(rendered)?;
        Ok(Flow::Continue)
    }

    fn say(&mut self, message: impl Display) -> io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }

    fn warn(&mut self, message: impl Display) -> io::Result<()> {
        self.say(format_args!("WARNING: {}", message))
    }

    fn report_error(&mut self, message: impl Display) -> io::Result<Flow> {
        self.errors += 1;
        writeln!(self.out, "ERROR: {}", message)?;
        if self.errors >= self.options.error_limit {
            writeln!(self.out, "Error limit exceeded. Stopping command execution")?;
            return Ok(Flow::Abort);
        }
        Ok(Flow::Continue)
    }
}
