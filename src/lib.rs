//! glass_sessions - CI session runner for glass
//!
//! Lint, test, coverage, benchmark and regression-comparison sessions for the
//! glass library, run against every configured python version.
//!
//! # Modules
//!
//! - [`revision`] - Resolve positional arguments into revisions
//! - [`source_ref`] - `git+<url>@<revision>` install tokens
//! - [`session`] - Session definitions and planning
//! - [`runner`] - Process-backed and recording task runners
//! - [`backend`] - Array backends the test suite runs against
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing setup
//! - [`cli`] - Command-line parsing

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod revision;
pub mod runner;
pub mod session;
pub mod source_ref;

// Convenient re-exports at crate root
pub use backend::ArrayBackend;
pub use config::AppConfig;
pub use error::SessionError;
pub use revision::{RevisionPair, RevisionResolver};
pub use runner::{ProcessRunner, RecordingRunner, Step, TaskRunner};
pub use session::{SessionContext, SessionKind, SessionPlan, SessionRequest};
pub use source_ref::SourceRef;
