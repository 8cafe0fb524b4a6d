use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation kinds an actor can perform against a module
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    Read,
    Write,
    Approve,
    Delete,
}

impl PermissionAction {
    /// Get all available actions in display order
    pub fn all() -> Vec<PermissionAction> {
        vec![
            PermissionAction::Read,
            PermissionAction::Write,
            PermissionAction::Approve,
            PermissionAction::Delete,
        ]
    }

    /// Convert to string for Casbin policy
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::Read => "read",
            PermissionAction::Write => "write",
            PermissionAction::Approve => "approve",
            PermissionAction::Delete => "delete",
        }
    }

    /// Parse from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<PermissionAction> {
        match s.to_lowercase().as_str() {
            "read" => Some(PermissionAction::Read),
            "write" => Some(PermissionAction::Write),
            "approve" => Some(PermissionAction::Approve),
            "delete" => Some(PermissionAction::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
