use anyhow::{Result, bail};
use codeplan_agent::RuntimeSettings;

use super::bootstrap::{load_project, open_version_store};
use super::local::write_back;
use super::render::print_versions;
use crate::cli::VersionsCommand;

pub(crate) fn run_versions_command(
    action: VersionsCommand,
    runtime_settings: &RuntimeSettings,
) -> Result<()> {
    match action {
        VersionsCommand::List { dir } => {
            let store = open_version_store(runtime_settings, &dir)?;
            print_versions(&store.list_all()?);
        }
        VersionsCommand::Clear { dir, yes } => {
            if !yes {
                bail!("refusing to delete every version without --yes");
            }
            let store = open_version_store(runtime_settings, &dir)?;
            store.clear_all()?;
            println!("All versions deleted.");
        }
        VersionsCommand::Restore { number, dir } => {
            let store = open_version_store(runtime_settings, &dir)?;
            let Some(version) = store.get(number)? else {
                bail!("version {number} not found");
            };
            let current = load_project(&dir)?;
            write_back(&dir, &current, &version.files)?;
            println!("Restored version {number}.");
        }
    }
    Ok(())
}
