//! run command - Execute a harness script

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::config::{check_bufsize, Config};
use crate::harness::{Options, RunSummary, Session};
use crate::ui::output;

/// Command-line overrides for harness options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOverrides {
    pub bufsize: Option<usize>,
    pub error_limit: Option<usize>,
    pub echo: bool,
}

impl RunOverrides {
    /// Apply the overrides on top of config-derived options.
    fn apply(&self, mut options: Options) -> Result<Options> {
        if let Some(bufsize) = self.bufsize {
            options.bufsize = check_bufsize(bufsize).context("Invalid --bufsize")?;
        }
        if let Some(limit) = self.error_limit {
            if limit == 0 {
                bail!("--error-limit must be at least 1");
            }
            options.error_limit = limit;
        }
        options.echo |= self.echo;
        Ok(options)
    }
}

/// Run a script from `script`, or stdin when `None`.
///
/// Fails when the script could not be read or when the run reported any
/// errors.
pub fn run(
    ctx: &Context,
    script: Option<&Path>,
    overrides: RunOverrides,
    json: bool,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let config = Config::load(ctx.config.as_deref()).context("Failed to load config")?;
    if let Some(path) = config.loaded_from() {
        output::debug(format!("config loaded from {}", path.display()), verbosity);
    }

    let options = overrides.apply(Options::from(&config))?;
    output::debug(
        format!(
            "bufsize={} error_limit={} echo={}",
            options.bufsize, options.error_limit, options.echo
        ),
        verbosity,
    );

    let summary = {
        let mut session = Session::new(options, io::stdout().lock(), verbosity);
        let result = match script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open script '{}'", path.display()))?;
                session.run(BufReader::new(file))
            }
            None => session.run(io::stdin().lock()),
        };
        result.context("Failed to run script")?
    };

    report(&summary, json, verbosity)?;

    if summary.errors > 0 {
        bail!("{} error(s) reported", summary.errors);
    }
    Ok(())
}

fn report(summary: &RunSummary, json: bool, verbosity: output::Verbosity) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    let size = summary
        .final_size
        .map_or_else(|| "no queue".to_string(), |n| format!("final size {}", n));
    output::print(
        format!(
            "{} commands, {} errors, {}",
            summary.commands, summary.errors, size
        ),
        verbosity,
    );
    if summary.stopped_early {
        output::warn("run stopped at the error limit", verbosity);
    }
    Ok(())
}
