//! Command-line arguments for the `decide` binary.
//!
//! ```text
//! decide [--config <file>] [--reward <r>] [--next-state <key>] [snapshot.json | -]
//! ```
//!
//! The snapshot is read from the given file, or from stdin when the path is
//! `-` or absent.

use std::path::PathBuf;

use crate::error::CliError;

pub const USAGE: &str = "\
usage: decide [--config <file>] [--reward <r>] [--next-state <key>] [snapshot.json | -]

  --config <file>      pipeline YAML configuration
  --reward <r>         apply reward r to the decision just made
  --next-state <key>   state reached after the decision (with --reward)
  -h, --help           print this message
  -V, --version        print the version";

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Decide for one snapshot, optionally rewarding the result.
    Decide(DecideArgs),
    Help,
    Version,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecideArgs {
    pub config: Option<PathBuf>,
    /// `None` reads stdin.
    pub input: Option<PathBuf>,
    pub reward: Option<f64>,
    pub next_state: Option<String>,
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I, S>(args: I) -> Result<CliCommand, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = DecideArgs::default();
    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "--config" => {
                let value = args.next().ok_or(CliError::MissingValue("--config"))?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--reward" => {
                let value = args.next().ok_or(CliError::MissingValue("--reward"))?;
                let reward = value
                    .parse::<f64>()
                    .ok()
                    .filter(|r| r.is_finite())
                    .ok_or(CliError::InvalidValue {
                        flag: "--reward",
                        value,
                    })?;
                parsed.reward = Some(reward);
            }
            "--next-state" => {
                let value = args.next().ok_or(CliError::MissingValue("--next-state"))?;
                parsed.next_state = Some(value);
            }
            "-" => parsed.input = None,
            other if other.starts_with('-') => {
                return Err(CliError::UnknownArgument(other.to_string()))
            }
            path => {
                if parsed.input.is_some() {
                    return Err(CliError::UnknownArgument(path.to_string()));
                }
                parsed.input = Some(PathBuf::from(path));
            }
        }
    }

    Ok(CliCommand::Decide(parsed))
}
