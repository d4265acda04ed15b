//! Task Runner
//!
//! Sessions never touch processes directly: they build a list of [`Step`]s and
//! hand them to a [`TaskRunner`].
//!
//! - [`ProcessRunner`] - installs and runs through `python<ver> -m`
//! - [`RecordingRunner`] - records steps without executing them (dry runs, tests)

use std::process::Command;

use crate::error::SessionError;

/// One unit of work inside a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Install packages into the session interpreter
    Install { packages: Vec<String> },
    /// Run a command with extra environment variables
    Run {
        command: Vec<String>,
        env: Vec<(String, String)>,
    },
    /// Progress message for the user
    Notice(String),
}

impl Step {
    pub fn install<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Step::Install {
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn run<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Step::Run {
            command: command.into_iter().map(Into::into).collect(),
            env: Vec::new(),
        }
    }

    pub fn with_env(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Step::Run { command, mut env } => {
                env.push((key.into(), value.into()));
                Step::Run { command, env }
            }
            other => other,
        }
    }
}

pub trait TaskRunner {
    fn execute(&mut self, python: Option<&str>, step: &Step) -> Result<(), SessionError>;
}

/// Runs steps as child processes, blocking on each.
///
/// Both installs and commands go through the session interpreter
/// (`python<ver> -m pip install ..`, `python<ver> -m pytest ..`), so every
/// python-parametrized run uses the packages installed for that version.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Interpreter used when a session is not python-parametrized
    default_python: String,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl ProcessRunner {
    pub fn new(default_python: impl Into<String>) -> Self {
        Self {
            default_python: default_python.into(),
        }
    }

    fn interpreter(&self, python: Option<&str>) -> String {
        match python {
            Some(version) => format!("python{}", version),
            None => self.default_python.clone(),
        }
    }

    /// Module a command is run as: `pre-commit` is importable as `pre_commit`.
    fn module_name(program: &str) -> String {
        program.replace('-', "_")
    }

    fn spawn(mut cmd: Command, shown: String) -> Result<(), SessionError> {
        let status = cmd.status()?;
        if status.success() {
            Ok(())
        } else {
            tracing::error!(command = %shown, %status, "command failed");
            Err(SessionError::CommandFailed {
                command: shown,
                status: status.to_string(),
            })
        }
    }
}

impl TaskRunner for ProcessRunner {
    fn execute(&mut self, python: Option<&str>, step: &Step) -> Result<(), SessionError> {
        match step {
            Step::Install { packages } => {
                let interpreter = self.interpreter(python);
                let shown = format!("{} -m pip install {}", interpreter, packages.join(" "));
                tracing::info!(command = %shown, "install");
                let mut cmd = Command::new(&interpreter);
                cmd.args(["-m", "pip", "install"]).args(packages);
                Self::spawn(cmd, shown)
            }
            Step::Run { command, env } => {
                let Some((program, args)) = command.split_first() else {
                    return Err(SessionError::Config("empty command".to_string()));
                };
                let interpreter = self.interpreter(python);
                let module = Self::module_name(program);
                let shown = format!("{} -m {} {}", interpreter, module, args.join(" "))
                    .trim_end()
                    .to_string();
                tracing::info!(command = %shown, "run");
                let mut cmd = Command::new(&interpreter);
                cmd.args(["-m", module.as_str()])
                    .args(args)
                    .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                Self::spawn(cmd, shown)
            }
            Step::Notice(message) => {
                tracing::info!("{}", message);
                Ok(())
            }
        }
    }
}

/// Records every step it is given.
#[derive(Debug, Default, Clone)]
pub struct RecordingRunner {
    pub executed: Vec<(Option<String>, Step)>,
}

impl RecordingRunner {
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.executed.iter().map(|(_, step)| step)
    }
}

impl TaskRunner for RecordingRunner {
    fn execute(&mut self, python: Option<&str>, step: &Step) -> Result<(), SessionError> {
        tracing::debug!(?python, ?step, "dry-run");
        self.executed.push((python.map(str::to_string), step.clone()));
        Ok(())
    }
}
