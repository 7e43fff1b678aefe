//! Layered CLI configuration, loaded via `confy` from the platform
//! config directory (and overridable from the command line), mirroring
//! the reference CLI's `ConfigLoad`.

use serde_derive::{Deserialize, Serialize};

pub const DEFAULT_PROMPT: &str = "pathkv";
pub const DEFAULT_DB_NAME: &str = "pathkv.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigLoad {
    version: u8,

    /// Database directory, relative to the current directory unless
    /// absolute. Overridden by `--dir` on the command line.
    pub database_dir: Option<String>,

    pub prompt: Option<String>,

    /// Multi line mode: keep reading continuation lines until a
    /// quoted string or parenthesis balances. Default true.
    pub multi_line: Option<bool>,

    /// Show stats (elapsed time) after executing one-shot commands.
    pub show_stats: Option<bool>,

    /// `log`/`fern` level filter for the CLI's own log file.
    pub log_level: Option<String>,
}

impl Default for ConfigLoad {
    fn default() -> Self {
        ConfigLoad {
            version: 1,
            database_dir: Some(DEFAULT_DB_NAME.to_string()),
            prompt: Some(DEFAULT_PROMPT.to_string()),
            multi_line: Some(true),
            show_stats: Some(false),
            log_level: Some("info".to_string()),
        }
    }
}

impl ConfigLoad {
    pub fn database_dir(&self) -> &str {
        self.database_dir.as_deref().unwrap_or(DEFAULT_DB_NAME)
    }

    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    pub fn multi_line(&self) -> bool {
        self.multi_line.unwrap_or(true)
    }

    pub fn show_stats(&self) -> bool {
        self.show_stats.unwrap_or(false)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Raises the in-terminal verbosity for an interactive session,
    /// matching the reference CLI's `terminal_update`.
    pub fn terminal_update(&mut self) {
        self.show_stats = Some(true);
    }

    /// Applies a `.set key value` control command typed at the REPL.
    pub fn inject_cmd(&mut self, cmd_name: &str, cmd_value: &str) -> bool {
        match cmd_name {
            "prompt" => self.prompt = Some(cmd_value.to_string()),
            "multi_line" => self.multi_line = cmd_value.parse().ok(),
            "show_stats" => self.show_stats = cmd_value.parse().ok(),
            "log_level" => self.log_level = Some(cmd_value.to_string()),
            _ => return false,
        }
        true
    }
}
