//! Command dispatch and execution

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, TreeArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_dir, global_config_path, local_config_path, Settings};
use crate::domain::TreeOptions;
use crate::infrastructure::di::ServiceContainer;

/// Execute the parsed command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build { dir, format, tree }) => cmd_build(dir, *format, tree),
        Some(Commands::Tree { dir, tree }) => cmd_tree(dir, tree),
        Some(Commands::Config { command }) => execute_config(command),
        // handled in main.rs
        Some(Commands::Completion { .. }) => Ok(()),
        None => Err(CliError::Usage(
            "no command given, see `foldertree --help`".into(),
        )),
    }
}

/// Settings for `dir` with the command line flags on top.
fn effective_options(dir: &Path, args: &TreeArgs) -> CliResult<(Settings, TreeOptions)> {
    let settings = Settings::load(Some(dir))?;
    let mut options = settings.tree.clone();
    args.apply(&mut options);
    debug!("effective options: {:?}", options);
    Ok((settings, options))
}

#[instrument(skip(args))]
fn cmd_build(
    dir: &Path,
    format: Option<crate::application::services::OutputFormat>,
    args: &TreeArgs,
) -> CliResult<()> {
    let (settings, options) = effective_options(dir, args)?;
    let format = format.unwrap_or(settings.format);
    let container = ServiceContainer::new(settings);
    let service = container.tree_service();

    let tree = service.build(dir, &options)?;
    let rendered = service.render(&tree, format)?;
    output::info(rendered.trim_end());
    Ok(())
}

#[instrument(skip(args))]
fn cmd_tree(dir: &Path, args: &TreeArgs) -> CliResult<()> {
    let (settings, options) = effective_options(dir, args)?;
    let container = ServiceContainer::new(settings);
    let service = container.tree_service();

    let tree = service.build(dir, &options)?;
    output::info(service.outline(&tree).trim_end());
    Ok(())
}

fn execute_config(cmd: &ConfigCommands) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show { dir } => {
            let settings = Settings::load(dir.as_deref())?;
            output::info(settings.to_toml()?.trim_end());
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("no home directory, global config unavailable"),
            }
            let cwd = current_dir()?;
            output::action("Local", &local_config_path(&cwd).display());
            Ok(())
        }
        ConfigCommands::Init { global, dir } => {
            let path = if *global {
                let dir = global_config_dir().ok_or_else(|| {
                    CliError::Usage("no home directory, cannot create global config".into())
                })?;
                std::fs::create_dir_all(&dir).map_err(|e| config_io_err(&dir, e))?;
                dir.join("foldertree.toml")
            } else {
                let root = match dir {
                    Some(dir) => dir.clone(),
                    None => current_dir()?,
                };
                local_config_path(&root)
            };

            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }

            std::fs::write(&path, Settings::template()).map_err(|e| config_io_err(&path, e))?;
            output::success(&format!("Created config: {}", path.display()));
            Ok(())
        }
        ConfigCommands::Template => {
            output::info(Settings::template().trim_end());
            Ok(())
        }
    }
}

fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir().map_err(|e| CliError::Usage(format!("cannot read cwd: {e}")))
}

fn config_io_err(path: &Path, e: std::io::Error) -> CliError {
    CliError::Application(ApplicationError::Config {
        message: format!("{}: {e}", path.display()),
    })
}
