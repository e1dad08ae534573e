use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub list: ListInfo,
    #[serde(default)]
    pub reorder: ReorderConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInfo {
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for ListInfo {
    fn default() -> Self {
        ListInfo {
            name: default_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderConfig {
    /// Days after today that a task dropped into "upcoming" is due.
    /// Must be at least 2, otherwise the task would not be upcoming.
    #[serde(default = "default_upcoming_offset_days")]
    pub upcoming_offset_days: u32,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        ReorderConfig {
            upcoming_offset_days: default_upcoming_offset_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Filter used by `td list` when none was given and none is remembered
    #[serde(default = "default_filter")]
    pub default_filter: String,
    /// Task text longer than this (in terminal cells) is truncated in listings.
    /// 0 disables truncation.
    #[serde(default = "default_max_text_width")]
    pub max_text_width: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_filter: default_filter(),
            max_text_width: default_max_text_width(),
        }
    }
}

/// Smallest accepted `upcoming_offset_days`
pub const MIN_UPCOMING_OFFSET_DAYS: u32 = 2;

fn default_name() -> String {
    "To-do".to_string()
}

fn default_upcoming_offset_days() -> u32 {
    7
}

fn default_filter() -> String {
    "all".to_string()
}

fn default_max_text_width() -> usize {
    72
}
