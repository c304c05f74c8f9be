//! Project directory resolution.
//!
//! `CODEPLAN_ROOT` anchors relative paths (falls back to the working directory);
//! `CODEPLAN_CONFIG_HOME` and `CODEPLAN_DATA_HOME` default to `.config` and
//! `.data` under that root. Values are resolved once per process.

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG_HOME: OnceLock<PathBuf> = OnceLock::new();
static DATA_HOME: OnceLock<PathBuf> = OnceLock::new();
static PROJECT_ROOT: OnceLock<PathBuf> = OnceLock::new();

const ROOT_ENV: &str = "CODEPLAN_ROOT";
const CONFIG_HOME_ENV: &str = "CODEPLAN_CONFIG_HOME";
const DATA_HOME_ENV: &str = "CODEPLAN_DATA_HOME";

/// Project directory resolver.
#[derive(Debug, Clone)]
pub struct ProjectDirs;

impl ProjectDirs {
    /// Configuration directory. Default: `.config` (relative to project root).
    #[must_use]
    pub fn config_home() -> PathBuf {
        CONFIG_HOME
            .get_or_init(|| resolve_dir(CONFIG_HOME_ENV, ".config"))
            .clone()
    }

    /// Data directory (version store files). Default: `.data`.
    #[must_use]
    pub fn data_home() -> PathBuf {
        DATA_HOME
            .get_or_init(|| resolve_dir(DATA_HOME_ENV, ".data"))
            .clone()
    }

    /// Project root used to anchor relative paths.
    #[must_use]
    pub fn project_root() -> PathBuf {
        PROJECT_ROOT.get_or_init(root_from_env).clone()
    }

    /// Pin the configuration directory (the `--conf` flag).
    ///
    /// Returns `false` if the directory was already resolved; the first value stays.
    pub fn set_config_home(path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let path = if path.is_absolute() {
            path
        } else {
            Self::project_root().join(path)
        };
        CONFIG_HOME.set(path).is_ok()
    }
}

fn root_from_env() -> PathBuf {
    env::var(ROOT_ENV).map_or_else(
        |_| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        PathBuf::from,
    )
}

/// Env value if set, else `default`; relative paths are anchored to the project root.
fn resolve_dir(env_key: &str, default: &str) -> PathBuf {
    let path = PathBuf::from(env::var(env_key).unwrap_or_else(|_| default.to_string()));
    if path.is_absolute() {
        return path;
    }
    ProjectDirs::project_root().join(path)
}
