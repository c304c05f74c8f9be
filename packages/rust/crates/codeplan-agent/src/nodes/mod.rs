mod bootstrap;
mod github;
mod local;
mod render;
mod repl;
mod versions;

pub(crate) use github::run_github_command;
pub(crate) use local::{run_apply_mode, run_generate_mode, run_tree_mode};
pub(crate) use repl::run_repl_mode;
pub(crate) use versions::run_versions_command;
