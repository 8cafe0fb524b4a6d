use casbin::{CoreApi, Enforcer};
use gatehouse_core::authorization::{ModuleAccess, PermissionAction, Role};
use std::path::Path;
use tracing::{debug, info, warn};

use super::casbin::{CasbinManager, VISIBLE_ACTION};
use super::config::ConfigManager;
use super::error::PolicyError;
use super::types::{EffectivePermissions, PolicyConfig, PolicyMode};

/// Casbin-backed per-role permission table.
///
/// Built once from a [`PolicyConfig`]; every lookup afterwards is a
/// synchronous, read-only enforce call.
pub struct PermissionTable {
    enforcer: Enforcer,
    config: PolicyConfig,
}

impl PermissionTable {
    pub async fn new(config: PolicyConfig) -> Result<Self, PolicyError> {
        let enforcer = CasbinManager::create_enforcer(&config).await?;

        info!(
            "Permission table initialized with {} roles ({:?} mode)",
            config.roles.len(),
            config.mode
        );

        Ok(Self { enforcer, config })
    }

    /// Load the table from a YAML file, see [`ConfigManager::load_config`]
    pub async fn load(path: &Path) -> Result<Self, PolicyError> {
        let config = ConfigManager::load_config(path).await?;
        Self::new(config).await
    }

    /// Table with the built-in grants
    pub async fn with_defaults() -> Result<Self, PolicyError> {
        Self::new(ConfigManager::default_config()).await
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn mode(&self) -> PolicyMode {
        self.config.mode
    }

    /// Whether the table names this role at all
    pub fn has_entry(&self, role: Role) -> bool {
        self.config.roles.contains_key(&role)
    }

    /// Check if a role is granted an action on a module
    pub fn allows(&self, role: Role, module: ModuleAccess, action: PermissionAction) -> bool {
        let granted = self
            .enforcer
            .enforce(vec![role.as_str(), module.as_str(), action.as_str()])
            .unwrap_or_else(|e| {
                warn!("Casbin enforce failed, denying: {}", e);
                false
            });

        if granted {
            debug!("Permission granted: {} can {} on {}", role, action, module);
            return true;
        }

        if self.config.mode == PolicyMode::Permissive && !self.has_entry(role) {
            debug!(
                "Permissive fallback: {} has no table entry, allowing {} on {}",
                role, action, module
            );
            return true;
        }

        debug!("Permission denied: {} cannot {} on {}", role, action, module);
        false
    }

    /// Look up the dedicated module-visibility table.
    /// Returns `None` when no such table is configured.
    pub fn is_visible(&self, role: Role, module: ModuleAccess) -> Option<bool> {
        self.config.visibility.as_ref()?;

        let visible = self
            .enforcer
            .enforce(vec![role.as_str(), module.as_str(), VISIBLE_ACTION])
            .unwrap_or(false);
        Some(visible)
    }

    /// Expanded grants of a single role
    pub fn permissions_for(&self, role: Role) -> EffectivePermissions {
        let mut permissions = EffectivePermissions::new();
        for module in ModuleAccess::all() {
            for action in PermissionAction::all() {
                if self.allows(role, module, action) {
                    permissions.entry(module).or_default().insert(action);
                }
            }
        }
        permissions
    }
}

impl std::fmt::Debug for PermissionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionTable")
            .field("mode", &self.config.mode)
            .field("roles", &self.config.roles.len())
            .finish_non_exhaustive()
    }
}
