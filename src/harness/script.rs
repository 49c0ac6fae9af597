//! harness::script
//!
//! Parsing of harness script lines.
//!
//! # Grammar
//!
//! ```text
//! line    := [command] ['#' comment]
//! command := word {whitespace word}
//! ```
//!
//! Values are single whitespace-free words. Blank and comment-only lines
//! parse to `None`.

use thiserror::Error;

/// Largest repeat count accepted by `ih`/`it`.
pub const MAX_REPEAT: usize = 1_000_000;

/// Errors from parsing a script line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("invalid value '{0}'")]
    InvalidValue(String),

    #[error("'{value}' is outside {min}..={max}")]
    OutOfRange {
        value: String,
        min: usize,
        max: usize,
    },
}

/// A single harness command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    Free,
    InsertHead { value: String, count: usize },
    InsertTail { value: String, count: usize },
    RemoveHead { expected: Option<String> },
    RemoveHeadQuiet,
    Size { expected: Option<usize> },
    Reverse,
    Show,
    SetOption { name: String, value: String },
    Help,
    Quit,
}

impl Command {
    /// Whether the command can change the queue structure.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::New
                | Command::Free
                | Command::InsertHead { .. }
                | Command::InsertTail { .. }
                | Command::RemoveHead { .. }
                | Command::RemoveHeadQuiet
                | Command::Reverse
        )
    }
}

/// One line of `help` output per command.
pub const HELP: &[(&str, &str)] = &[
    ("new", "Create new queue"),
    ("free", "Delete queue"),
    ("ih str [n]", "Insert string str at head of queue n times (default 1)"),
    ("it str [n]", "Insert string str at tail of queue n times (default 1)"),
    ("rh [str]", "Remove from head of queue, optionally compare to str"),
    ("rhq", "Remove from head of queue without reporting value"),
    ("size [n]", "Compute queue size, optionally compare to n"),
    ("reverse", "Reverse queue"),
    ("show", "Display queue contents"),
    ("option name val", "Set option (bufsize, error_limit, echo)"),
    ("help", "Show this list"),
    ("quit", "Exit"),
];

/// Parse one script line.
///
/// # Errors
///
/// Returns a [`ScriptError`] for unknown commands, wrong arity, or
/// malformed numbers.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.split('#').next().unwrap_or_default();
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (name, args) {
        ("new", []) => Command::New,
        ("free", []) => Command::Free,
        ("ih", [value, rest @ ..]) if rest.len() <= 1 => Command::InsertHead {
            value: value.to_string(),
            count: parse_count(rest.first())?,
        },
        ("it", [value, rest @ ..]) if rest.len() <= 1 => Command::InsertTail {
            value: value.to_string(),
            count: parse_count(rest.first())?,
        },
        ("rh", []) => Command::RemoveHead { expected: None },
        ("rh", [value]) => Command::RemoveHead {
            expected: Some(value.to_string()),
        },
        ("rhq", []) => Command::RemoveHeadQuiet,
        ("size", []) => Command::Size { expected: None },
        ("size", [n]) => Command::Size {
            expected: Some(parse_number(n)?),
        },
        ("reverse", []) => Command::Reverse,
        ("show", []) => Command::Show,
        ("option", [option, value]) => Command::SetOption {
            name: option.to_string(),
            value: value.to_string(),
        },
        ("help", []) => Command::Help,
        ("quit", []) => Command::Quit,
        _ => return Err(usage_for(name)),
    };
    Ok(Some(command))
}

fn parse_count(word: Option<&&str>) -> Result<usize, ScriptError> {
    let Some(word) = word else {
        return Ok(1);
    };
    match parse_number(word)? {
        n if n > MAX_REPEAT => Err(ScriptError::OutOfRange {
            value: word.to_string(),
            min: 0,
            max: MAX_REPEAT,
        }),
        n => Ok(n),
    }
}

pub(crate) fn parse_number(word: &str) -> Result<usize, ScriptError> {
    word.parse()
        .map_err(|_| ScriptError::InvalidNumber(word.to_string()))
}

/// Parse an on/off option value.
pub(crate) fn parse_switch(word: &str) -> Result<bool, ScriptError> {
    match word {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(ScriptError::InvalidValue(word.to_string())),
    }
}

fn usage_for(name: &str) -> ScriptError {
    HELP.iter()
        .map(|&(synopsis, _)| synopsis)
        .find(|synopsis| synopsis.split(' ').next() == Some(name))
        .map_or_else(
            || ScriptError::UnknownCommand(name.to_string()),
            ScriptError::Usage,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# just a comment"), Ok(None));
    }

    #[test]
    fn insert_with_and_without_count() {
        assert_eq!(
            parse_line("ih dolphin"),
            Ok(Some(Command::InsertHead {
                value: "dolphin".into(),
                count: 1
            }))
        );
        assert_eq!(
            parse_line("it gerbil 3 # trailing comment"),
            Ok(Some(Command::InsertTail {
                value: "gerbil".into(),
                count: 3
            }))
        );
    }

    #[test]
    fn remove_and_size_optional_arguments() {
        assert_eq!(
            parse_line("rh"),
            Ok(Some(Command::RemoveHead { expected: None }))
        );
        assert_eq!(
            parse_line("rh bear"),
            Ok(Some(Command::RemoveHead {
                expected: Some("bear".into())
            }))
        );
        assert_eq!(
            parse_line("size 4"),
            Ok(Some(Command::Size { expected: Some(4) }))
        );
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            parse_line("frobnicate"),
            Err(ScriptError::UnknownCommand("frobnicate".into()))
        );
    }

    #[test]
    fn wrong_arity_reports_usage() {
        assert_eq!(parse_line("ih"), Err(ScriptError::Usage("ih str [n]")));
        assert_eq!(parse_line("ih a 1 2"), Err(ScriptError::Usage("ih str [n]")));
        assert_eq!(parse_line("reverse now"), Err(ScriptError::Usage("reverse")));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert_eq!(
            parse_line("it a lots"),
            Err(ScriptError::InvalidNumber("lots".into()))
        );
        assert_eq!(
            parse_line("size -1"),
            Err(ScriptError::InvalidNumber("-1".into()))
        );
    }

    #[test]
    fn repeat_count_is_capped() {
        assert_eq!(
            parse_line("ih x 1000000"),
            Ok(Some(Command::InsertHead {
                value: "x".into(),
                count: MAX_REPEAT
            }))
        );
        assert_eq!(
            parse_line("ih x 18446744073709551615"),
            Err(ScriptError::OutOfRange {
                value: "18446744073709551615".into(),
                min: 0,
                max: MAX_REPEAT
            })
        );
    }

    #[test]
    fn switches() {
        assert_eq!(parse_switch("on"), Ok(true));
        assert_eq!(parse_switch("0"), Ok(false));
        assert_eq!(
            parse_switch("maybe"),
            Err(ScriptError::InvalidValue("maybe".into()))
        );
    }

    #[test]
    fn mutating_classification() {
        assert!(Command::Reverse.is_mutating());
        assert!(Command::RemoveHeadQuiet.is_mutating());
        assert!(!Command::Show.is_mutating());
        assert!(!Command::Size { expected: None }.is_mutating());
    }
}
