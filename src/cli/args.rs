//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of searching
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// qtest - Drive a linked-list string queue from command scripts
#[derive(Parser, Debug)]
#[command(name = "qtest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default search path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; only errors are printed
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a harness script against a fresh queue
    #[command(
        name = "run",
        long_about = "Run a harness script against a fresh queue.\n\n\
            Each line holds one command. The queue starts absent, so scripts \
            normally begin with `new`. After every mutating command the queue's \
            structure is verified. Errors are counted, and the run stops once the \
            error limit is reached.",
        after_help = "\
SCRIPT COMMANDS:
    new                 Create new queue
    free                Delete queue
    ih str [n]          Insert str at head n times
    it str [n]          Insert str at tail n times
    rh [str]            Remove from head, optionally compare to str
    rhq                 Remove from head without reporting value
    size [n]            Report size, optionally compare to n
    reverse             Reverse queue
    show                Display queue contents
    option name val     Set bufsize, error_limit, or echo
    help                List commands
    quit                Stop

WORKFLOW EXAMPLES:
    # Run a script file
    qtest run traces/fifo.cmd

    # Pipe commands on stdin
    printf 'new\\nit a\\nrh a\\n' | qtest run

    # Machine-readable summary for CI
    qtest run traces/fifo.cmd --json -q"
    )]
    Run {
        /// Script file to run (reads stdin when omitted)
        script: Option<PathBuf>,

        /// Removal buffer capacity, terminator included
        #[arg(long)]
        bufsize: Option<usize>,

        /// Stop after this many errors
        #[arg(long)]
        error_limit: Option<usize>,

        /// Echo each command before running it
        #[arg(long)]
        echo: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    #[command(
        name = "config",
        long_about = "Show the effective configuration.\n\n\
            Prints every setting with defaults applied, as TOML, together with \
            the file it was loaded from."
    )]
    Config,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    qtest completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    qtest completion zsh >> ~/.zshrc"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "qtest",
            "--debug",
            "run",
            "script.cmd",
            "--bufsize",
            "8",
            "--echo",
        ])
        .unwrap();

        assert!(cli.debug);
        match cli.command {
            Command::Run {
                script,
                bufsize,
                echo,
                json,
                ..
            } => {
                assert_eq!(script, Some(PathBuf::from("script.cmd")));
                assert_eq!(bufsize, Some(8));
                assert!(echo);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
