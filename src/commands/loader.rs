//! Command manifest discovery.
//!
//! This module provides the [`CommandLoader`], which turns the commands
//! directory into the list of schemas to register and the registry of handlers
//! to dispatch to.
//!
//! # Manifest Format
//!
//! Every `*.yaml` / `*.yml` file under the directory, at any depth, is a
//! command manifest:
//!
//! ```yaml
//! name: echo
//! description: Repeat a message
//! options:
//!   - name: text
//!     description: What to repeat
//!     type: string
//!     required: true
//! run: echo
//! ```
//!
//! - A manifest without `name` declares no command and is skipped.
//! - `run` names a handler from the [`HandlerTable`]. Without it (or with a key
//!   the table does not know) the command is registered but has no handler.
//!
//! # Traversal Order
//!
//! Directories are walked depth first, entries sorted by file name, so the
//! registration payload is the same on every start.

use std::{
    collections::HashMap,
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::Arc,
};

use figment::{
    Figment,
    providers::{Format, Yaml},
};
use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

use crate::commands::{CommandHandler, CommandOptionSchema, CommandRegistry, CommandSchema};

/// Handlers a manifest may bind through its `run` key.
pub type HandlerTable = HashMap<&'static str, Arc<dyn CommandHandler>>;

/// Errors that stop command loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configured path does not exist or is not a directory
    #[error("commands directory {} doesn't exist", .0.display())]
    MissingDirectory(PathBuf),
    /// A directory entry could not be read
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A manifest is not valid YAML or does not match the manifest shape
    #[error("invalid command manifest {}", .path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },
    /// A manifest names a command but gives no description
    #[error("command manifest {} has a name but no description", .0.display())]
    MissingDescription(PathBuf),
    /// Two manifests declare the same command name
    #[error(
        "command /{name} is declared by both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateCommand {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Schemas and handlers collected from the commands directory.
#[derive(Default)]
pub struct LoadedCommands {
    /// Schemas in discovery order, one per command
    pub schemas: Vec<CommandSchema>,
    /// Handlers of the commands that have one
    pub registry: CommandRegistry,
}

/// Result of a successful load.
pub enum LoadOutcome {
    /// No manifest at the top level of the directory; nothing is registered
    Empty,
    /// Manifests were found and parsed
    Loaded(LoadedCommands),
}

/// Raw manifest file content.
#[derive(Debug, Deserialize)]
struct CommandManifest {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    options: Vec<CommandOptionSchema>,
    run: Option<String>,
}

/// Directory entry seen during traversal.
struct Entry {
    path: PathBuf,
    is_dir: bool,
}

/// Loads command manifests from a directory tree.
///
/// # Examples
///
/// ```no_run
/// # use herald::commands::{CommandLoader, LoadOutcome, actions::builtin_handlers};
/// # async fn example() -> Result<(), herald::commands::LoadError> {
/// let loader = CommandLoader::new("commands".into(), builtin_handlers());
/// if let LoadOutcome::Loaded(loaded) = loader.load().await? {
///     println!("{} commands", loaded.schemas.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct CommandLoader {
    /// Root of the commands tree
    directory: PathBuf,
    /// Handlers manifests can bind to
    handlers: HandlerTable,
}

impl CommandLoader {
    pub fn new(directory: PathBuf, handlers: HandlerTable) -> Self {
        CommandLoader {
            directory,
            handlers,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Scans the directory and builds the schemas and registry.
    ///
    /// # Returns
    ///
    /// * `Ok(LoadOutcome::Empty)` - The top level holds no manifest
    /// * `Ok(LoadOutcome::Loaded(_))` - Every manifest was parsed
    ///
    /// # Errors
    ///
    /// Fails when the directory is missing, when a file cannot be read or
    /// parsed, and when two manifests declare the same command name.
    pub async fn load(&self) -> Result<LoadOutcome, LoadError> {
        match fs::metadata(&self.directory).await {
            Ok(metadata) if metadata.is_dir() => {}
            _ => return Err(LoadError::MissingDirectory(self.directory.clone())),
        }

        let top_level = read_sorted(&self.directory).await?;
        if !top_level
            .iter()
            .any(|entry| !entry.is_dir && is_manifest(&entry.path))
        {
            info!(
                "no command manifests found in provided directory: {}",
                self.directory.display()
            );
            return Ok(LoadOutcome::Empty);
        }

        let mut loaded = LoadedCommands::default();
        let mut origins: HashMap<String, PathBuf> = HashMap::new();

        for path in discover(top_level).await? {
            let manifest = read_manifest(&path).await?;
            let Some(name) = manifest.name else {
                debug!("skipping {}: no command declared", path.display());
                continue;
            };
            let Some(description) = manifest.description else {
                return Err(LoadError::MissingDescription(path));
            };

            if let Some(first) = origins.insert(name.clone(), path.clone()) {
                return Err(LoadError::DuplicateCommand {
                    name,
                    first,
                    second: path,
                });
            }

            match manifest.run.as_deref() {
                Some(key) => match self.handlers.get(key) {
                    Some(handler) => {
                        loaded.registry.insert(name.as_str(), Arc::clone(handler));
                    }
                    None => warn!(
                        "command /{} refers to unknown handler `{}`, registering it without one",
                        name, key
                    ),
                },
                None => warn!("command /{} has no handler", name),
            }

            info!("loaded {}", path.display());
            loaded.schemas.push(CommandSchema {
                name,
                description,
                options: manifest.options,
            });
        }

        Ok(LoadOutcome::Loaded(loaded))
    }
}

/// Walks the tree depth first and returns manifest paths in traversal order.
async fn discover(top_level: Vec<Entry>) -> Result<Vec<PathBuf>, LoadError> {
    let mut manifests = Vec::new();
    let mut pending: Vec<Entry> = top_level.into_iter().rev().collect();

    while let Some(entry) = pending.pop() {
        if entry.is_dir {
            pending.extend(read_sorted(&entry.path).await?.into_iter().rev());
        } else if is_manifest(&entry.path) {
            manifests.push(entry.path);
        }
    }

    Ok(manifests)
}

async fn read_sorted(directory: &Path) -> Result<Vec<Entry>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: directory.to_path_buf(),
        source,
    };

    let mut read_dir = fs::read_dir(directory).await.map_err(io_error)?;
    let mut entries = Vec::new();
    while let Some(dir_entry) = read_dir.next_entry().await.map_err(io_error)? {
        let file_type = dir_entry.file_type().await.map_err(io_error)?;
        entries.push(Entry {
            path: dir_entry.path(),
            is_dir: file_type.is_dir(),
        });
    }
    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    Ok(entries)
}

async fn read_manifest(path: &Path) -> Result<CommandManifest, LoadError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Figment::from(Yaml::string(&content))
        .extract()
        .map_err(|source| LoadError::InvalidManifest {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(OsStr::to_str),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use std::fs as std_fs;

    use tempfile::TempDir;

    use super::*;
    use crate::commands::{OptionKind, actions::builtin_handlers};

    const TEST_MANIFEST: &str = "name: test\ndescription: test command\nrun: test\n";

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std_fs::create_dir_all(parent).unwrap();
        }
        std_fs::write(path, content).unwrap();
    }

    fn manifest(name: &str, run: Option<&str>) -> String {
        let mut content = format!("name: {name}\ndescription: {name} command\n");
        if let Some(run) = run {
            content.push_str(&format!("run: {run}\n"));
        }
        content
    }

    async fn load(dir: &TempDir) -> Result<LoadOutcome, LoadError> {
        CommandLoader::new(dir.path().to_path_buf(), builtin_handlers())
            .load()
            .await
    }

    async fn load_commands(dir: &TempDir) -> LoadedCommands {
        match load(dir).await.unwrap() {
            LoadOutcome::Loaded(loaded) => loaded,
            LoadOutcome::Empty => panic!("Expected loaded commands"),
        }
    }

    fn names(loaded: &LoadedCommands) -> Vec<&str> {
        loaded.schemas.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let result = CommandLoader::new(missing.clone(), builtin_handlers())
            .load()
            .await;

        assert!(matches!(result, Err(LoadError::MissingDirectory(path)) if path == missing));
    }

    #[tokio::test]
    async fn test_directory_is_a_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "commands", "not a directory");

        let result = CommandLoader::new(dir.path().join("commands"), builtin_handlers())
            .load()
            .await;

        assert!(matches!(result, Err(LoadError::MissingDirectory(_))));
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = TempDir::new().unwrap();

        assert!(matches!(load(&dir).await, Ok(LoadOutcome::Empty)));
    }

    #[tokio::test]
    async fn test_only_nested_manifests_counts_as_empty() {
        let dir = TempDir::new().unwrap();
        write(&dir, "nested/test.yaml", TEST_MANIFEST);
        write(&dir, "README.md", "# commands");

        assert!(matches!(load(&dir).await, Ok(LoadOutcome::Empty)));
    }

    #[tokio::test]
    async fn test_single_command() {
        let dir = TempDir::new().unwrap();
        write(&dir, "test.yaml", TEST_MANIFEST);

        let loaded = load_commands(&dir).await;

        assert_eq!(
            loaded.schemas,
            vec![CommandSchema {
                name: "test".to_string(),
                description: "test command".to_string(),
                options: Vec::new(),
            }]
        );
        assert!(loaded.registry.contains("test"));
        assert_eq!(loaded.registry.len(), 1);
    }

    #[tokio::test]
    async fn test_traversal_is_depth_first_and_sorted() {
        let dir = TempDir::new().unwrap();
        write(&dir, "d.yaml", &manifest("delta", None));
        write(&dir, "b/c.yml", &manifest("charlie", None));
        write(&dir, "b/a/z.yaml", &manifest("zulu", None));
        write(&dir, "a.yaml", &manifest("alpha", None));
        write(&dir, "notes.txt", "ignored");

        let loaded = load_commands(&dir).await;

        assert_eq!(names(&loaded), vec!["alpha", "zulu", "charlie", "delta"]);
    }

    #[tokio::test]
    async fn test_schema_without_handler_is_registered_only_remotely() {
        let dir = TempDir::new().unwrap();
        write(&dir, "ping.yaml", &manifest("ping", None));

        let loaded = load_commands(&dir).await;

        assert_eq!(names(&loaded), vec!["ping"]);
        assert!(loaded.registry.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_handler_key_is_not_bound() {
        let dir = TempDir::new().unwrap();
        write(&dir, "ping.yaml", &manifest("ping", Some("does_not_exist")));

        let loaded = load_commands(&dir).await;

        assert_eq!(names(&loaded), vec!["ping"]);
        assert!(!loaded.registry.contains("ping"));
    }

    #[tokio::test]
    async fn test_handler_is_registered_under_schema_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "works.yaml", &manifest("works", Some("test")));

        let loaded = load_commands(&dir).await;

        assert!(loaded.registry.contains("works"));
        assert!(!loaded.registry.contains("test"));
    }

    #[tokio::test]
    async fn test_manifest_without_name_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.yaml", "run: test\n");
        write(&dir, "b.yaml", TEST_MANIFEST);

        let loaded = load_commands(&dir).await;

        assert_eq!(names(&loaded), vec!["test"]);
    }

    #[tokio::test]
    async fn test_manifest_without_description_fails() {
        let dir = TempDir::new().unwrap();
        write(&dir, "test.yaml", "name: test\n");

        let result = load(&dir).await;

        assert!(matches!(result, Err(LoadError::MissingDescription(_))));
    }

    #[tokio::test]
    async fn test_options_are_parsed() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "echo.yaml",
            r#"
name: echo
description: Repeat a message
run: echo
options:
  - name: text
    description: What to repeat
    type: string
    required: true
  - name: private
    description: Only show the reply to you
    type: boolean
"#,
        );

        let loaded = load_commands(&dir).await;
        let options = &loaded.schemas[0].options;

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].kind, OptionKind::String);
        assert!(options[0].required);
        assert_eq!(options[1].kind, OptionKind::Boolean);
        assert!(!options[1].required);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.yaml", &manifest("test", Some("test")));
        write(&dir, "nested/b.yaml", &manifest("test", Some("echo")));

        let result = load(&dir).await;

        match result {
            Err(LoadError::DuplicateCommand {
                name,
                first,
                second,
            }) => {
                assert_eq!(name, "test");
                assert!(first.ends_with("a.yaml"));
                assert!(second.ends_with("nested/b.yaml"));
            }
            _ => panic!("Expected DuplicateCommand error"),
        }
    }

    #[tokio::test]
    async fn test_malformed_manifest_fails() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.yaml", "name: [unterminated\n");

        let result = load(&dir).await;

        assert!(matches!(result, Err(LoadError::InvalidManifest { .. })));
    }
}
