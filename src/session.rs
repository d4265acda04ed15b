//! Session definitions
//!
//! Each session turns the configuration and its positional arguments into a
//! [`SessionPlan`]. Plans are built for every requested session before any
//! of them runs, so a bad revision argument aborts the run before anything
//! is installed.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::backend::{ARRAY_BACKEND_VAR, ArrayBackend};
use crate::config::AppConfig;
use crate::error::SessionError;
use crate::revision::{AFTER_REVISION_VAR, BEFORE_REVISION_VAR, RevisionResolver};
use crate::runner::{Step, TaskRunner};
use crate::source_ref::SourceRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Lint,
    Tests,
    Coverage,
    Benchmark,
    RegressionTests,
}

impl SessionKind {
    pub const ALL: [SessionKind; 5] = [
        SessionKind::Lint,
        SessionKind::Tests,
        SessionKind::Coverage,
        SessionKind::Benchmark,
        SessionKind::RegressionTests,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SessionKind::Lint => "lint",
            SessionKind::Tests => "tests",
            SessionKind::Coverage => "coverage",
            SessionKind::Benchmark => "benchmark",
            SessionKind::RegressionTests => "regression-tests",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SessionKind::Lint => "Run the linter.",
            SessionKind::Tests => "Run the unit tests.",
            SessionKind::Coverage => "Run tests and compute coverage of glass.",
            SessionKind::Benchmark => "Run the benchmarks against one revision.",
            SessionKind::RegressionTests => {
                "Compare benchmarks of a before and an after revision."
            }
        }
    }

    /// Whether the session runs once per configured python version.
    pub fn python_parametrized(self) -> bool {
        !matches!(self, SessionKind::Lint)
    }

    /// Number of revisions the session expects as positional arguments.
    pub fn revision_arity(self) -> Option<usize> {
        match self {
            SessionKind::Benchmark => Some(1),
            SessionKind::RegressionTests => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SessionKind {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('_', "-");
        SessionKind::ALL
            .into_iter()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| SessionError::UnknownSession(s.to_string()))
    }
}

/// A session to run, optionally pinned to one python version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub kind: SessionKind,
    pub python: Option<String>,
}

impl SessionRequest {
    /// Parse `benchmark` or `benchmark-3.12` style names.
    pub fn parse(name: &str, config: &AppConfig) -> Result<Self, SessionError> {
        if let Ok(kind) = name.parse::<SessionKind>() {
            return Ok(Self { kind, python: None });
        }

        let (base, version) = name
            .rsplit_once('-')
            .ok_or_else(|| SessionError::UnknownSession(name.to_string()))?;
        let kind: SessionKind = base
            .parse()
            .map_err(|_| SessionError::UnknownSession(name.to_string()))?;

        if !kind.python_parametrized() {
            return Err(SessionError::UnknownSession(format!(
                "{} (session '{}' is not parametrized by python)",
                name, kind
            )));
        }
        if !config.python.iter().any(|v| v == version) {
            return Err(SessionError::UnknownSession(format!(
                "{} (python {} is not one of {})",
                name,
                version,
                config.python.join(", ")
            )));
        }

        Ok(Self {
            kind,
            python: Some(version.to_string()),
        })
    }

    /// Concrete (kind, python) pairs this request runs as.
    pub fn expand(&self, config: &AppConfig) -> Vec<(SessionKind, Option<String>)> {
        match (&self.python, self.kind.python_parametrized()) {
            (Some(v), _) => vec![(self.kind, Some(v.clone()))],
            (None, true) => config
                .python
                .iter()
                .map(|v| (self.kind, Some(v.clone())))
                .collect(),
            (None, false) => vec![(self.kind, None)],
        }
    }
}

/// Everything a session needs besides its own kind.
pub struct SessionContext<'a> {
    pub config: &'a AppConfig,
    pub posargs: &'a [String],
    pub backend: Option<ArrayBackend>,
    /// Environment lookup used for `BEFORE_REVISION` / `AFTER_REVISION`
    pub env: &'a dyn Fn(&str) -> Option<String>,
}

impl SessionContext<'_> {
    fn resolver(&self) -> RevisionResolver {
        RevisionResolver::new(self.config.project.default_branch.clone())
    }

    fn source(&self, revision: &str) -> String {
        SourceRef::new(&self.config.project.repository_url, revision).to_string()
    }

    fn pytest<I, S>(&self, extra: I) -> Step
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command: Vec<String> = std::iter::once("pytest".to_string())
            .chain(extra.into_iter().map(Into::into))
            .collect();
        let step = Step::run(command);
        match self.backend {
            Some(backend) => step.with_env(ARRAY_BACKEND_VAR, backend.module_name()),
            None => step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub kind: SessionKind,
    pub python: Option<String>,
    pub steps: Vec<Step>,
}

impl SessionPlan {
    pub fn label(&self) -> String {
        match &self.python {
            Some(v) => format!("{}-{}", self.kind, v),
            None => self.kind.to_string(),
        }
    }
}

/// Build the steps of one session. Fails before producing any step when the
/// revision arguments are invalid.
pub fn plan(
    kind: SessionKind,
    python: Option<String>,
    ctx: &SessionContext<'_>,
) -> Result<SessionPlan, SessionError> {
    let config = ctx.config;
    let mut steps = Vec::new();

    match kind {
        SessionKind::Lint => {
            steps.push(Step::install(["pre-commit"]));
            steps.push(Step::run(
                ["pre-commit", "run", "--all-files"]
                    .into_iter()
                    .map(str::to_string)
                    .chain(ctx.posargs.iter().cloned()),
            ));
        }
        SessionKind::Tests => {
            steps.push(Step::install(config.dependencies.iter().cloned()));
            steps.push(ctx.pytest(ctx.posargs.iter().cloned()));
        }
        SessionKind::Coverage => {
            steps.push(Step::install(config.dependencies.iter().cloned()));
            let mut args = vec!["--cov".to_string()];
            args.extend(ctx.posargs.iter().cloned());
            steps.push(
                ctx.pytest(args)
                    .with_env("PYTHONPATH", config.project.source_dir.clone()),
            );
        }
        SessionKind::Benchmark => {
            let revision = ctx.resolver().resolve(ctx.posargs, 1)?.first;
            steps.push(Step::install(config.dependencies.iter().cloned()));
            steps.push(Step::install([ctx.source(&revision)]));
            steps.push(ctx.pytest(["--benchmark-autosave"]));
        }
        SessionKind::RegressionTests => {
            let resolver = ctx.resolver();
            let from_env = ctx.posargs.is_empty()
                && [AFTER_REVISION_VAR, BEFORE_REVISION_VAR]
                    .iter()
                    .any(|var| (ctx.env)(*var).is_some());
            let pair = if from_env {
                resolver.resolve_from_env(ctx.env)?
            } else {
                resolver.resolve(ctx.posargs, 2)?
            };
            let (before, after) = pair.before_after();

            steps.push(Step::install(config.dependencies.iter().cloned()));
            steps.push(Step::Notice(format!(
                "Generating before benchmark for comparison from revision {}",
                before
            )));
            steps.push(Step::install([ctx.source(before)]));
            steps.push(ctx.pytest(["--benchmark-autosave"]));
            steps.push(Step::Notice(format!(
                "Comparing before benchmark to revision {}",
                after
            )));
            steps.push(Step::install([ctx.source(after)]));
            steps.push(ctx.pytest([
                format!("--benchmark-compare={}", config.benchmark.compare_id),
                format!(
                    "--benchmark-compare-fail=min:{}%",
                    config.benchmark.compare_fail_min_percent
                ),
            ]));
        }
    }

    Ok(SessionPlan {
        kind,
        python,
        steps,
    })
}

/// Plan every request, then run the plans in order. Stops at the first
/// failing step.
pub fn run_sessions<R: TaskRunner>(
    requests: &[SessionRequest],
    ctx: &SessionContext<'_>,
    runner: &mut R,
) -> Result<Vec<SessionPlan>, SessionError> {
    let mut plans = Vec::new();
    for request in requests {
        for (kind, python) in request.expand(ctx.config) {
            plans.push(plan(kind, python, ctx)?);
        }
    }

    for plan in &plans {
        tracing::info!(session = %plan.label(), steps = plan.steps.len(), "Running session");
        for step in &plan.steps {
            runner.execute(plan.python.as_deref(), step)?;
        }
        tracing::info!(session = %plan.label(), "Session succeeded");
    }

    Ok(plans)
}

/// Session listing entry, serialized by `--list --json`.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub python: Vec<String>,
    pub revisions: Option<usize>,
    pub default: bool,
}

pub fn list_sessions(config: &AppConfig) -> Vec<SessionInfo> {
    SessionKind::ALL
        .into_iter()
        .map(|kind| SessionInfo {
            name: kind.name(),
            description: kind.description(),
            python: if kind.python_parametrized() {
                config.python.clone()
            } else {
                Vec::new()
            },
            revisions: kind.revision_arity(),
            default: config
                .default_sessions
                .iter()
                .any(|s| s.parse::<SessionKind>().ok() == Some(kind)),
        })
        .collect()
}
