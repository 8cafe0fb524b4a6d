use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[readonly::make]
pub struct SessionSettings {
    /// File holding the continuation token between runs
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

impl SessionSettings {
    pub fn new(token_file: impl Into<PathBuf>) -> Self {
        Self {
            token_file: token_file.into(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

/// `~/.config/gatehouse/session.json`, or a relative `.gatehouse/session.json`
/// when no home directory is known.
pub fn default_token_file() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".config")
            .join("gatehouse")
            .join("session.json"),
        Err(_) => PathBuf::from(".gatehouse").join("session.json"),
    }
}
