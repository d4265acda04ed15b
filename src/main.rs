//! glass_sessions - CI session runner
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │   CLI    │───▶│ Revision │───▶│   Plan   │───▶│  Runner  │
//! │ (posargs)│    │ Resolver │    │ (steps)  │    │(pip/pytest)
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Every session is planned before the first one runs, so revision errors
//! surface before anything is installed.

use std::path::Path;

use anyhow::{Context, Result};

use glass_sessions::cli::{CliArgs, USAGE};
use glass_sessions::config::AppConfig;
use glass_sessions::revision::process_env;
use glass_sessions::runner::{ProcessRunner, RecordingRunner, Step};
use glass_sessions::session::{self, SessionContext, SessionRequest};

fn load_config(cli: &CliArgs) -> Result<AppConfig> {
    if let Some(path) = &cli.config_path {
        return AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }
    let default_path = format!("config/{}.yaml", cli.env);
    if Path::new(&default_path).exists() {
        AppConfig::load(&cli.env).with_context(|| format!("Failed to load config {}", default_path))
    } else {
        Ok(AppConfig::default())
    }
}

fn print_plan(plans: &[session::SessionPlan]) {
    for plan in plans {
        println!("* {}", plan.label());
        for step in &plan.steps {
            match step {
                Step::Install { packages } => println!("    install {}", packages.join(" ")),
                Step::Run { command, env } => {
                    let env: Vec<String> = env.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                    if env.is_empty() {
                        println!("    run {}", command.join(" "));
                    } else {
                        println!("    run {} {}", env.join(" "), command.join(" "));
                    }
                }
                Step::Notice(message) => println!("    # {}", message),
            }
        }
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse(std::env::args().skip(1))?;

    if cli.help {
        println!("{}", USAGE);
        return Ok(());
    }
    if cli.version {
        println!(
            "glass_sessions {} ({})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH")
        );
        return Ok(());
    }

    let config = load_config(&cli)?;
    let _log_guard = glass_sessions::logging::init_logging(&config);

    tracing::debug!(env = %cli.env, "Configuration loaded");

    if cli.list {
        let sessions = session::list_sessions(&config);
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        } else {
            for info in sessions {
                let marker = if info.default { "*" } else { "-" };
                println!("{} {:<18} {}", marker, info.name, info.description);
            }
        }
        return Ok(());
    }

    let names = if cli.sessions.is_empty() {
        config.default_sessions.clone()
    } else {
        cli.sessions.clone()
    };
    let requests = names
        .iter()
        .map(|name| SessionRequest::parse(name, &config))
        .collect::<Result<Vec<_>, _>>()?;

    let ctx = SessionContext {
        config: &config,
        posargs: &cli.posargs,
        backend: cli.backend,
        env: &process_env,
    };

    if cli.dry_run {
        let mut runner = RecordingRunner::default();
        let plans = session::run_sessions(&requests, &ctx, &mut runner)?;
        print_plan(&plans);
    } else {
        let mut runner = ProcessRunner::default();
        session::run_sessions(&requests, &ctx, &mut runner)?;
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("❌ {:#}", err);
        std::process::exit(1);
    }
}
