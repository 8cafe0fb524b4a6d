use serde::{Deserialize, Serialize};

use crate::authorization::{ModuleAccess, PermissionAction, Role};

/// Request to evaluate whether a route renders for the current actor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::Parser))]
pub struct RouteCheckRequest {
    /// Requested path, e.g. /finance/approvals
    pub path: String,
}

/// Request to test a single module/action permission for the current actor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::Parser))]
pub struct PermissionCheckRequest {
    /// Module to test, e.g. finance
    pub module: ModuleAccess,
    /// Action to test, e.g. approve
    pub action: PermissionAction,
}

/// Request to evaluate an in-page gate.
/// Every requirement left out is skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::Parser))]
pub struct GateCheckRequest {
    /// Any of these roles is sufficient (repeatable or comma-separated)
    #[cfg_attr(feature = "clap", arg(long = "role", value_delimiter = ','))]
    pub roles: Vec<Role>,
    #[cfg_attr(feature = "clap", arg(long))]
    pub module: Option<ModuleAccess>,
    /// Only used together with --module; defaults to read
    #[cfg_attr(feature = "clap", arg(long))]
    pub action: Option<PermissionAction>,
}
