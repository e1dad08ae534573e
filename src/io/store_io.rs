use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::config::{Config, MIN_UPCOMING_OFFSET_DAYS};
use crate::model::store::Store;
use crate::model::task::Task;

/// Name of the data directory holding config and tasks
pub const DATA_DIR: &str = ".tudu";
pub const CONFIG_FILE: &str = "config.toml";
pub const TASKS_FILE: &str = "tasks.json";

/// Error type for store I/O operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a tudu list: no .tudu/ directory found (run `td init`)")]
    NotAStore,
    #[error("a tudu list already exists at {0} (use --force to reinitialize)")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("could not parse {path}: {source}")]
    TasksParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

const CONFIG_TEMPLATE: &str = r##"[list]
name = ""

[reorder]
# Days after today that a task dropped into "upcoming" becomes due.
# Must be 2 or more.
upcoming_offset_days = 7

[ui]
# Filter used by `td list` when none is given: all, active, completed
default_filter = "all"
# Truncate task text in listings to this many terminal cells (0 = never)
max_text_width = 72
"##;

/// Discover the store by walking up from the given directory, looking for a
/// `.tudu/` subdirectory with a config file.
pub fn discover_store(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join(DATA_DIR);
        if data_dir.is_dir() && data_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(StoreError::NotAStore);
        }
    }
}

/// Create `.tudu/` with a default config and an empty task list.
pub fn init_store(root: &Path, name: &str, force: bool) -> Result<PathBuf, StoreError> {
    let data_dir = root.join(DATA_DIR);
    if data_dir.join(CONFIG_FILE).exists() && !force {
        return Err(StoreError::AlreadyExists(data_dir));
    }
    fs::create_dir_all(&data_dir).map_err(|e| StoreError::WriteError {
        path: data_dir.clone(),
        source: e,
    })?;

    let config_text = render_config(name)?;
    let config_path = data_dir.join(CONFIG_FILE);
    atomic_write(&config_path, config_text.as_bytes()).map_err(|e| StoreError::WriteError {
        path: config_path,
        source: e,
    })?;

    let tasks_path = data_dir.join(TASKS_FILE);
    if !tasks_path.exists() {
        save_tasks(&data_dir, &[])?;
    }
    tracing::debug!(path = %data_dir.display(), "initialized store");
    Ok(data_dir)
}

/// Fill the list name into the config template. Going through toml_edit
/// quotes and escapes the name and keeps the template's comments.
fn render_config(name: &str) -> Result<String, StoreError> {
    let mut doc: toml_edit::DocumentMut = CONFIG_TEMPLATE
        .parse()
        .map_err(|e: toml_edit::TomlError| StoreError::InvalidConfig(e.to_string()))?;
    doc["list"]["name"] = toml_edit::value(name);
    Ok(doc.to_string())
}

/// Load the config and task list from the given root directory.
pub fn load_store(root: &Path) -> Result<Store, StoreError> {
    let data_dir = root.join(DATA_DIR);
    if !data_dir.is_dir() {
        return Err(StoreError::NotAStore);
    }

    let config_path = data_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| StoreError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&config_text)?;
    validate_config(&config)?;

    let tasks = load_tasks(&data_dir)?;
    tracing::debug!(root = %root.display(), count = tasks.len(), "loaded store");

    Ok(Store {
        root: root.to_path_buf(),
        data_dir,
        config,
        tasks,
    })
}

/// Reject config values the reorder engine can't honor.
pub fn validate_config(config: &Config) -> Result<(), StoreError> {
    if config.reorder.upcoming_offset_days < MIN_UPCOMING_OFFSET_DAYS {
        return Err(StoreError::InvalidConfig(format!(
            "reorder.upcoming_offset_days must be at least {} (got {})",
            MIN_UPCOMING_OFFSET_DAYS, config.reorder.upcoming_offset_days
        )));
    }
    Ok(())
}

/// Read tasks.json. A missing file is an empty list.
pub fn load_tasks(data_dir: &Path) -> Result<Vec<Task>, StoreError> {
    let path = data_dir.join(TASKS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&text).map_err(|e| StoreError::TasksParseError { path, source: e })
}

/// Write tasks.json atomically.
pub fn save_tasks(data_dir: &Path, tasks: &[Task]) -> Result<(), StoreError> {
    let path = data_dir.join(TASKS_FILE);
    let mut content = serde_json::to_string_pretty(tasks)?;
    content.push('\n');
    atomic_write(&path, content.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
