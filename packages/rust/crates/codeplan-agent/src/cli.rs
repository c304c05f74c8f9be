use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "codeplan")]
#[command(about = "Apply model-authored edit plans to a project, with undo and version history.")]
pub(crate) struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence).
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Apply an edit plan file (or `-` for stdin) and show the result.
    Apply {
        /// Project directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Plan JSON file, optionally fenced. `-` reads stdin.
        #[arg(long)]
        plan: PathBuf,

        /// Record a version and write the result back to the directory.
        #[arg(long)]
        write: bool,
    },
    /// Ask the model for a plan and show the staged result.
    Generate {
        /// Project directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// What to change.
        #[arg(long)]
        instruction: String,

        /// Comma-separated files or folders to send as context (default: all).
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        /// Model override.
        #[arg(long)]
        model: Option<String>,

        /// Approve immediately and write the result back to the directory.
        #[arg(long)]
        write: bool,
    },
    /// Interactive session: each line is an instruction; `:help` lists commands.
    Repl {
        /// Project directory (ignored with --github).
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Edit a GitHub repository instead, as `owner/repo`.
        #[arg(long)]
        github: Option<String>,

        /// Model override.
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the project file tree.
    Tree {
        /// Project directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Inspect or manage recorded versions.
    Versions {
        #[command(subcommand)]
        action: VersionsCommand,
    },
    /// GitHub import/export.
    Github {
        #[command(subcommand)]
        action: GithubCommand,
    },
}

#[derive(Subcommand)]
pub(crate) enum VersionsCommand {
    /// List versions of a project.
    List {
        /// Project directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Delete every version and reset numbering.
    Clear {
        /// Project directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Write a version back to the project directory.
    Restore {
        /// Version number.
        number: u64,

        /// Project directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Subcommand)]
pub(crate) enum GithubCommand {
    /// List repositories of an owner.
    Repos {
        /// Owner (default: `github.owner` setting).
        #[arg(long)]
        owner: Option<String>,
    },
    /// Download the default branch into a directory.
    Pull {
        /// Owner (default: `github.owner` setting).
        #[arg(long)]
        owner: Option<String>,

        /// Repository name.
        #[arg(long)]
        repo: String,

        /// Target directory.
        #[arg(long)]
        out: PathBuf,
    },
    /// Commit a directory on top of the default branch; remote files missing on disk are deleted.
    Push {
        /// Owner (default: `github.owner` setting).
        #[arg(long)]
        owner: Option<String>,

        /// Repository name.
        #[arg(long)]
        repo: String,

        /// Project directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Commit message.
        #[arg(long)]
        message: String,
    },
}
