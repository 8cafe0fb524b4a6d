use gatehouse_core::access::requests::GateCheckRequest;
use gatehouse_core::authorization::{ModuleAccess, PermissionAction, Role};
use std::collections::BTreeSet;
use tracing::debug;

use crate::services::authorization::{AccessSnapshot, AuthorizationEngine};

/// What an in-page subtree needs in order to be shown.
///
/// Every field left as `None` is skipped. `roles: Some(empty)` also means no
/// role requirement. An `action` without a `module` is ignored; a `module`
/// without an `action` checks read permission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    pub roles: Option<BTreeSet<Role>>,
    pub module: Option<ModuleAccess>,
    pub action: Option<PermissionAction>,
}

impl Requirement {
    /// Only an authenticated session is required
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any_role(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::none().with_roles(roles)
    }

    pub fn permission(module: ModuleAccess, action: PermissionAction) -> Self {
        Self::none().with_module(module).with_action(action)
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = Some(roles.into_iter().collect());
        self
    }

    pub fn with_module(mut self, module: ModuleAccess) -> Self {
        self.module = Some(module);
        self
    }

    pub fn with_action(mut self, action: PermissionAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_met_by(&self, snapshot: &AccessSnapshot) -> bool {
        if !snapshot.is_authenticated() {
            return false;
        }

        if let Some(roles) = &self.roles {
            if !roles.is_empty() && !snapshot.has_any_role(roles) {
                return false;
            }
        }

        match (self.module, self.action) {
            (Some(module), Some(action)) => snapshot.has_permission(module, action),
            (Some(module), None) => snapshot.has_permission(module, PermissionAction::Read),
            (None, _) => true,
        }
    }
}

impl From<GateCheckRequest> for Requirement {
    fn from(request: GateCheckRequest) -> Self {
        Self {
            roles: (!request.roles.is_empty()).then(|| request.roles.into_iter().collect()),
            module: request.module,
            action: request.action,
        }
    }
}

/// Show/hide a subtree without navigating anywhere
#[derive(Debug, Clone)]
pub struct RenderGate {
    engine: AuthorizationEngine,
}

impl RenderGate {
    pub fn new(engine: AuthorizationEngine) -> Self {
        Self { engine }
    }

    /// `true` shows the primary subtree, `false` the fallback
    pub fn evaluate(&self, requirement: &Requirement) -> bool {
        let visible = requirement.is_met_by(&self.engine.snapshot());
        debug!(?requirement, visible, "Render gate evaluated");
        visible
    }

    pub fn render<T>(
        &self,
        requirement: &Requirement,
        primary: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.evaluate(requirement) {
            primary()
        } else {
            fallback()
        }
    }

    /// Like [`RenderGate::render`] with an empty fallback
    pub fn render_or_default<T: Default>(
        &self,
        requirement: &Requirement,
        primary: impl FnOnce() -> T,
    ) -> T {
        self.render(requirement, primary, T::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::route::{Decision, RouteGuard, RouteTable};
    use crate::services::authorization::PermissionTable;
    use crate::services::session::{MemoryTokenStore, SessionStore, StaticDirectory};
    use gatehouse_core::actor::Actor;
    use gatehouse_core::settings::directory::DirectorySettings;
    use gatehouse_core::settings::views::ViewSettings;
    use maplit::btreeset;
    use std::sync::Arc;

    async fn table() -> Arc<PermissionTable> {
        Arc::new(PermissionTable::with_defaults().await.unwrap())
    }

    async fn snapshot(roles: &[Role]) -> AccessSnapshot {
        let actor = Actor::new("u-1", roles.iter().copied());
        AccessSnapshot::new(Some(Arc::new(actor)), table().await)
    }

    #[tokio::test]
    async fn test_anonymous_sees_fallback() {
        let anonymous = AccessSnapshot::new(None, table().await);

        assert!(!Requirement::any_role([Role::Admin]).is_met_by(&anonymous));
        assert!(!Requirement::none().is_met_by(&anonymous));
        assert!(!Requirement::permission(ModuleAccess::Dashboard, PermissionAction::Read)
            .is_met_by(&anonymous));
    }

    #[tokio::test]
    async fn test_checks_are_combined() {
        let manager = snapshot(&[Role::Manager]).await;

        assert!(Requirement::none().is_met_by(&manager));
        assert!(Requirement::any_role([Role::Admin, Role::Manager]).is_met_by(&manager));
        assert!(!Requirement::any_role([Role::Admin]).is_met_by(&manager));

        let approve_loans = Requirement::permission(ModuleAccess::Loans, PermissionAction::Approve);
        assert!(approve_loans.is_met_by(&manager));
        assert!(!approve_loans
            .clone()
            .with_roles([Role::Officer])
            .is_met_by(&manager));

        assert!(!Requirement::permission(ModuleAccess::Users, PermissionAction::Delete)
            .is_met_by(&manager));
    }

    #[tokio::test]
    async fn test_module_alone_means_read() {
        let officer = snapshot(&[Role::Officer]).await;

        assert!(Requirement::none()
            .with_module(ModuleAccess::Applications)
            .is_met_by(&officer));
        assert!(!Requirement::none()
            .with_module(ModuleAccess::Finance)
            .is_met_by(&officer));
        // An action without a module is not a requirement
        assert!(Requirement::none()
            .with_action(PermissionAction::Delete)
            .is_met_by(&officer));
    }

    #[tokio::test]
    async fn test_empty_role_set_is_no_requirement() {
        let lessee = snapshot(&[Role::Lessee]).await;
        assert!(Requirement::any_role(Vec::<Role>::new()).is_met_by(&lessee));
    }

    #[tokio::test]
    async fn test_finance_approve_for_finance_officer() {
        let finance = snapshot(&[Role::FinanceOfficer]).await;
        let requirement = Requirement::permission(ModuleAccess::Finance, PermissionAction::Approve);

        assert_eq!(
            requirement.is_met_by(&finance),
            finance.table().allows(
                Role::FinanceOfficer,
                ModuleAccess::Finance,
                PermissionAction::Approve
            )
        );
        assert!(requirement.is_met_by(&finance));
    }

    #[tokio::test]
    async fn test_gate_agrees_with_route_guard() {
        let session = Arc::new(SessionStore::new(
            Arc::new(StaticDirectory::new(&DirectorySettings::default())),
            Arc::new(MemoryTokenStore::default()),
        ));
        let engine = AuthorizationEngine::new(session, table().await);
        let guard = RouteGuard::new(
            engine,
            ViewSettings::default(),
            btreeset! {Role::Lessee},
            RouteTable::default(),
        );

        let mut actors: Vec<AccessSnapshot> = vec![AccessSnapshot::new(None, table().await)];
        for role in Role::all() {
            actors.push(snapshot(&[role]).await);
        }
        actors.push(snapshot(&[Role::Lessee, Role::Officer]).await);

        for actor in &actors {
            for role in Role::all() {
                let gate = Requirement::any_role([role]).is_met_by(actor);
                let route = guard.decide(actor, Some(role)) == Decision::Render;
                assert_eq!(gate, route, "role {role} for {:?}", actor.actor());
            }
        }
    }

    #[test]
    fn test_from_gate_request() {
        let empty: Requirement = GateCheckRequest::default().into();
        assert_eq!(empty, Requirement::none());

        let request = GateCheckRequest {
            roles: vec![Role::Admin, Role::Manager],
            module: Some(ModuleAccess::Reports),
            action: None,
        };
        let requirement: Requirement = request.into();
        assert_eq!(requirement.roles, Some(btreeset! {Role::Admin, Role::Manager}));
        assert_eq!(requirement.module, Some(ModuleAccess::Reports));
    }
}
