//! Command-line parsing
//!
//! ```text
//! glass_sessions [--env <name>] [--config <path>] [--dry-run] [--list [--json]]
//!                [--backend <name>] [<session>[-<python>] ...] [-- <posargs>...]
//! ```
//!
//! Everything after `--` is handed to the sessions untouched.

use std::path::PathBuf;

use crate::backend::ArrayBackend;
use crate::error::SessionError;

pub const USAGE: &str = "Usage: glass_sessions [--env <name>] [--config <path>] [--dry-run] \
[--list [--json]] [--backend <name>] [<session>[-<python>] ...] [-- <posargs>...]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub env: String,
    pub config_path: Option<PathBuf>,
    pub dry_run: bool,
    pub list: bool,
    pub json: bool,
    pub help: bool,
    pub version: bool,
    pub backend: Option<ArrayBackend>,
    pub sessions: Vec<String>,
    pub posargs: Vec<String>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            env: "dev".to_string(),
            config_path: None,
            dry_run: false,
            list: false,
            json: false,
            help: false,
            version: false,
            backend: None,
            sessions: Vec::new(),
            posargs: Vec::new(),
        }
    }
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cli = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--" => {
                    cli.posargs.extend(args.by_ref());
                    break;
                }
                "--env" | "-e" => cli.env = value_for(&arg, args.next())?,
                "--config" => cli.config_path = Some(PathBuf::from(value_for(&arg, args.next())?)),
                "--backend" => cli.backend = Some(value_for(&arg, args.next())?.parse()?),
                "--dry-run" => cli.dry_run = true,
                "--list" | "-l" => cli.list = true,
                "--json" => cli.json = true,
                "--help" | "-h" => cli.help = true,
                "--version" | "-V" => cli.version = true,
                flag if flag.starts_with('-') => {
                    return Err(SessionError::Config(format!("unknown argument: {}", flag)));
                }
                _ => cli.sessions.push(arg),
            }
        }

        Ok(cli)
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, SessionError> {
    value.ok_or_else(|| SessionError::Config(format!("{} requires a value", flag)))
}
