//! codeplan CLI: apply or generate edit plans against a project directory.
//!
//! Logging: set `RUST_LOG=codeplan=debug` (or `warn`, `info`) to see logs on stderr.

mod cli;
mod nodes;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use codeplan_agent::{load_runtime_settings, set_config_home_override};

use crate::cli::{Cli, Command};
use crate::nodes::{
    run_apply_mode, run_generate_mode, run_github_command, run_repl_mode, run_tree_mode,
    run_versions_command,
};

const LOG_TARGETS: &[&str] = &[
    "codeplan",
    "codeplan_agent",
    "codeplan_edit",
    "codeplan_memory",
    "codeplan_io",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(conf_dir) = cli.conf.clone() {
        set_config_home_override(conf_dir);
    }

    // RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if cli.verbose { "debug" } else { "info" };
        let directives: Vec<String> = LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect();
        EnvFilter::new(directives.join(","))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let runtime_settings = load_runtime_settings();

    match cli.command {
        Command::Apply { dir, plan, write } => {
            run_apply_mode(&dir, &plan, write, &runtime_settings).await
        }
        Command::Generate {
            dir,
            instruction,
            select,
            model,
            write,
        } => run_generate_mode(&dir, &instruction, select, model, write, &runtime_settings).await,
        Command::Repl { dir, github, model } => {
            run_repl_mode(&dir, github, model, &runtime_settings).await
        }
        Command::Tree { dir } => run_tree_mode(&dir),
        Command::Versions { action } => run_versions_command(action, &runtime_settings),
        Command::Github { action } => run_github_command(action, &runtime_settings).await,
    }
}
