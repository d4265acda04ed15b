use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SessionError;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Write logs to `log_dir/log_file` in addition to stdout
    pub log_to_file: bool,
    pub project: ProjectConfig,
    /// Interpreter versions python-parametrized sessions run under
    pub python: Vec<String>,
    /// Packages every test-running session installs first
    pub dependencies: Vec<String>,
    pub benchmark: BenchmarkConfig,
    /// Sessions to run when none are named on the command line
    pub default_sessions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProjectConfig {
    pub repository_url: String,
    /// Baseline the before revision defaults to
    pub default_branch: String,
    /// Source directory exported as PYTHONPATH for coverage runs
    pub source_dir: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            repository_url: "https://github.com/glass-dev/glass".to_string(),
            default_branch: crate::revision::DEFAULT_BEFORE_REVISION.to_string(),
            source_dir: "glass".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Saved benchmark run the after revision is compared to
    pub compare_id: String,
    /// Regression threshold on the `min` statistic, in percent
    pub compare_fail_min_percent: u32,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            compare_id: "0001".to_string(),
            compare_fail_min_percent: 5,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "glass_sessions.log".to_string(),
            use_json: false,
            rotation: "never".to_string(),
            log_to_file: false,
            project: ProjectConfig::default(),
            python: ["3.10", "3.11", "3.12", "3.13"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
            dependencies: [
                "array-api-compat",
                "array-api-extra",
                "array-api-strict>=2",
                "healpix",
                "healpy",
                "jax>=0.4.32",
                "pytest",
                "pytest-benchmark",
                "pytest-cov",
                "transformcl",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
            benchmark: BenchmarkConfig::default(),
            default_sessions: vec!["tests".to_string()],
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`
    pub fn load(env: &str) -> Result<Self, SessionError> {
        Self::from_file(format!("config/{}.yaml", env))
    }

    /// Load configuration from YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| SessionError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.project.repository_url.is_empty() {
            return Err(SessionError::Config(
                "project.repository_url must not be empty".to_string(),
            ));
        }
        if self.project.default_branch.is_empty() {
            return Err(SessionError::Config(
                "project.default_branch must not be empty".to_string(),
            ));
        }
        if self.python.is_empty() {
            return Err(SessionError::Config(
                "at least one python version is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_glass() {
        let config = AppConfig::default();
        assert_eq!(config.project.repository_url, "https://github.com/glass-dev/glass");
        assert_eq!(config.project.default_branch, "main");
        assert_eq!(config.python, vec!["3.10", "3.11", "3.12", "3.13"]);
        assert_eq!(config.dependencies.len(), 10);
        assert_eq!(config.default_sessions, vec!["tests"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
log_level: "debug"
use_json: true
project:
  default_branch: "develop"
python: ["3.12"]
benchmark:
  compare_fail_min_percent: 10
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(config.use_json);
        assert_eq!(config.project.default_branch, "develop");
        assert_eq!(config.project.repository_url, "https://github.com/glass-dev/glass");
        assert_eq!(config.python, vec!["3.12"]);
        assert_eq!(config.benchmark.compare_fail_min_percent, 10);
        assert_eq!(config.benchmark.compare_id, "0001");
    }

    #[test]
    fn test_validate_rejects_empty_python_list() {
        let config = AppConfig {
            python: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_file("config/does-not-exist.yaml").unwrap_err();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
