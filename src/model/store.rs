use std::path::PathBuf;

use crate::model::config::Config;
use crate::model::task::Task;

/// A loaded to-do store: config plus the master task list
#[derive(Debug, Clone)]
pub struct Store {
    /// Directory containing `.tudu/`
    pub root: PathBuf,
    /// Path to the `.tudu/` directory
    pub data_dir: PathBuf,
    pub config: Config,
    /// Master list, in persisted order
    pub tasks: Vec<Task>,
}
