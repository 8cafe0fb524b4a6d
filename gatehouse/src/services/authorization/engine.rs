use gatehouse_core::actor::Actor;
use gatehouse_core::authorization::{ModuleAccess, PermissionAction, Role};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use super::service::PermissionTable;
use super::types::EffectivePermissions;
use crate::services::session::SessionStore;

/// Read-only decision functions over the current actor.
///
/// Every query answers from a fresh [`AccessSnapshot`]; nothing is cached
/// between calls, so a logout is visible to the very next check.
#[derive(Debug, Clone)]
pub struct AuthorizationEngine {
    session: Arc<SessionStore>,
    table: Arc<PermissionTable>,
}

impl AuthorizationEngine {
    pub fn new(session: Arc<SessionStore>, table: Arc<PermissionTable>) -> Self {
        Self { session, table }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn table(&self) -> &Arc<PermissionTable> {
        &self.table
    }

    /// Pin the current actor for a sequence of checks that must agree
    pub fn snapshot(&self) -> AccessSnapshot {
        AccessSnapshot {
            actor: self.session.current_actor(),
            table: self.table.clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.snapshot().has_role(role)
    }

    pub fn has_any_role(&self, roles: &BTreeSet<Role>) -> bool {
        self.snapshot().has_any_role(roles)
    }

    pub fn has_permission(&self, module: ModuleAccess, action: PermissionAction) -> bool {
        self.snapshot().has_permission(module, action)
    }

    pub fn has_access_to_module(&self, module: ModuleAccess) -> bool {
        self.snapshot().has_access_to_module(module)
    }

    pub fn effective_permissions(&self) -> EffectivePermissions {
        self.snapshot().effective_permissions()
    }
}

/// One actor, one permission table. Anonymous snapshots deny everything.
#[derive(Debug, Clone)]
pub struct AccessSnapshot {
    actor: Option<Arc<Actor>>,
    table: Arc<PermissionTable>,
}

impl AccessSnapshot {
    pub fn new(actor: Option<Arc<Actor>>, table: Arc<PermissionTable>) -> Self {
        Self { actor, table }
    }

    pub fn actor(&self) -> Option<&Arc<Actor>> {
        self.actor.as_ref()
    }

    pub fn table(&self) -> &Arc<PermissionTable> {
        &self.table
    }

    /// Authenticated with at least one role. A role-less actor has nothing
    /// that could be granted and is treated like an anonymous one.
    pub fn is_authenticated(&self) -> bool {
        self.actor
            .as_ref()
            .is_some_and(|actor| actor.has_grantable_role())
    }

    fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.actor
            .iter()
            .flat_map(|actor| actor.roles.iter().copied())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.actor.as_ref().is_some_and(|actor| actor.has_role(role))
    }

    /// An empty set means "no role requirement"
    pub fn has_any_role(&self, roles: &BTreeSet<Role>) -> bool {
        let Some(actor) = self.actor.as_ref() else {
            return false;
        };
        if roles.is_empty() {
            return self.is_authenticated();
        }
        actor.has_any_role(roles)
    }

    /// Granted when any of the actor's roles holds the grant
    pub fn has_permission(&self, module: ModuleAccess, action: PermissionAction) -> bool {
        let granted = self
            .roles()
            .any(|role| self.table.allows(role, module, action));

        debug!(
            actor = self.actor.as_ref().map(|a| a.id.as_str()).unwrap_or("anonymous"),
            "has_permission({}, {}) = {}",
            module,
            action,
            granted
        );
        granted
    }

    /// Uses the module-visibility table when one is configured,
    /// otherwise read permission on the module.
    pub fn has_access_to_module(&self, module: ModuleAccess) -> bool {
        if self.table.config().visibility.is_some() {
            return self
                .roles()
                .any(|role| self.table.is_visible(role, module).unwrap_or(false));
        }
        self.has_permission(module, PermissionAction::Read)
    }

    /// Union of the grants of every role the actor holds
    pub fn effective_permissions(&self) -> EffectivePermissions {
        let mut permissions = EffectivePermissions::new();
        for role in self.roles() {
            for (module, actions) in self.table.permissions_for(role) {
                permissions.entry(module).or_default().extend(actions);
            }
        }
        permissions
    }
}
