use gatehouse_core::authorization::{ModuleAccess, PermissionAction, Role};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use super::error::PolicyError;
use super::types::{ActionOrWildcard, ModuleOrWildcard, PolicyConfig, PolicyMode, RoleGrants};

/// Permission table loading and persistence
pub struct ConfigManager;

impl ConfigManager {
    /// Load the permission table from a YAML file.
    /// A missing file yields the built-in table; a broken file is an error.
    pub async fn load_config(path: &Path) -> Result<PolicyConfig, PolicyError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            warn!(
                "Permission table not found at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default_config());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PolicyError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: PolicyConfig =
            serde_norway::from_str(&content).map_err(|source| PolicyError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if config.mode == PolicyMode::Permissive {
            warn!(
                "Permission table {} uses permissive mode: roles without an entry are allowed everything. Do not use this in production.",
                path.display()
            );
        }
        info!(
            "Loaded permission table from {} with {} roles",
            path.display(),
            config.roles.len()
        );

        Ok(config)
    }

    /// Save the permission table to a YAML file
    pub async fn save_config(config: &PolicyConfig, path: &Path) -> Result<(), PolicyError> {
        let yaml = serde_norway::to_string(config).map_err(|source| PolicyError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tokio::fs::write(path, yaml)
            .await
            .map_err(|source| PolicyError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Built-in table used when no file is configured
    pub fn default_config() -> PolicyConfig {
        use ActionOrWildcard::{Action, Wildcard};
        use ModuleAccess::*;
        use PermissionAction::*;

        let m = ModuleOrWildcard::Module;
        let read = [Action(Read)];
        let read_write = [Action(Read), Action(Write)];
        let read_write_approve = [Action(Read), Action(Write), Action(Approve)];

        let roles = BTreeMap::from([
            (
                Role::Admin,
                RoleGrants::new("Administrator").grant(ModuleOrWildcard::Wildcard, &[Wildcard]),
            ),
            (
                Role::Manager,
                RoleGrants::new("Branch manager")
                    .grant(m(Applications), &read_write_approve)
                    .grant(m(Loans), &read_write_approve)
                    .grant(m(Customers), &read_write_approve)
                    .grant(m(Reports), &read_write_approve)
                    .grant(m(Dashboard), &read)
                    .grant(m(Finance), &read),
            ),
            (
                Role::Officer,
                RoleGrants::new("Loan officer")
                    .grant(m(Applications), &read_write)
                    .grant(m(Customers), &read_write)
                    .grant(m(Loans), &read_write)
                    .grant(m(Dashboard), &read),
            ),
            (
                Role::FinanceOfficer,
                RoleGrants::new("Finance officer")
                    .grant(m(Finance), &read_write_approve)
                    .grant(m(Dashboard), &read)
                    .grant(m(Loans), &read)
                    .grant(m(Reports), &read),
            ),
            (
                Role::ZonalAdmin,
                RoleGrants::new("Zonal administrator")
                    .grant(ModuleOrWildcard::Wildcard, &read)
                    .grant(m(Applications), &[Action(Approve)])
                    .grant(m(Loans), &[Action(Approve)]),
            ),
            (
                Role::Customer,
                RoleGrants::new("Customer")
                    .grant(m(Dashboard), &read)
                    .grant(m(Loans), &read),
            ),
            (
                Role::Lessee,
                RoleGrants::new("Lessee")
                    .grant(m(Dashboard), &read)
                    .grant(m(Loans), &read),
            ),
        ]);

        PolicyConfig {
            mode: PolicyMode::Strict,
            roles,
            visibility: None,
        }
    }
}
