use gatehouse_core::authorization::Role;
use gatehouse_core::settings::routes::RouteRule;
use gatehouse_core::settings::views::ViewSettings;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::services::authorization::{AccessSnapshot, AuthorizationEngine};

/// Where a redirect goes; resolved to a path via [`ViewSettings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    Login,
    CustomerPortal,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Render,
    RedirectTo {
        target: RedirectTarget,
        /// Remember the requested location for a return after login
        preserve_origin: bool,
    },
}

/// Outcome of [`RouteGuard::navigate`], with redirect targets resolved to paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Navigation {
    Render {
        path: String,
    },
    Redirect {
        to: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        return_to: Option<String>,
    },
}

/// Registered views, matched by longest path-segment prefix.
///
/// `/finance` covers `/finance/approvals` unless a more specific rule exists.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Canonical form used to compare registrations: `/a/b`, no trailing slash,
/// no query or fragment
pub fn normalize_path(path: &str) -> String {
    format!("/{}", segments(path).join("/"))
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn resolve(&self, path: &str) -> Option<&RouteRule> {
        let requested = segments(path);
        self.rules
            .iter()
            .filter(|rule| requested.starts_with(&segments(&rule.path)))
            .max_by_key(|rule| segments(&rule.path).len())
    }
}

/// Gate in front of every protected view
#[derive(Debug, Clone)]
pub struct RouteGuard {
    engine: AuthorizationEngine,
    views: ViewSettings,
    customer_roles: BTreeSet<Role>,
    routes: RouteTable,
}

impl RouteGuard {
    pub fn new(
        engine: AuthorizationEngine,
        views: ViewSettings,
        customer_roles: BTreeSet<Role>,
        routes: RouteTable,
    ) -> Self {
        Self {
            engine,
            views,
            customer_roles,
            routes,
        }
    }

    pub fn engine(&self) -> &AuthorizationEngine {
        &self.engine
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decide for the current session. Re-evaluated on every call.
    pub fn guard(&self, required_role: Option<Role>) -> Decision {
        self.decide(&self.engine.snapshot(), required_role)
    }

    pub fn decide(&self, snapshot: &AccessSnapshot, required_role: Option<Role>) -> Decision {
        let decision = match (snapshot.actor(), required_role) {
            _ if !snapshot.is_authenticated() => Decision::RedirectTo {
                target: RedirectTarget::Login,
                preserve_origin: true,
            },
            (Some(actor), Some(role)) if !snapshot.has_role(role) => {
                let target = if actor.has_any_role(&self.customer_roles) {
                    RedirectTarget::CustomerPortal
                } else {
                    RedirectTarget::Home
                };
                Decision::RedirectTo {
                    target,
                    preserve_origin: false,
                }
            }
            _ => Decision::Render,
        };

        debug!(?required_role, ?decision, "Route guard evaluated");
        decision
    }

    pub fn target_path(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::Login => &self.views.login,
            RedirectTarget::CustomerPortal => &self.views.customer_portal,
            RedirectTarget::Home => &self.views.home,
        }
    }

    /// Resolve a requested path against the route table and gate it.
    /// Public routes always render; unregistered paths only need a session.
    pub fn navigate(&self, path: &str) -> Navigation {
        let rule = self.routes.resolve(path);
        if rule.is_some_and(|rule| rule.public) {
            return Navigation::Render {
                path: path.to_string(),
            };
        }

        let required_role = rule.and_then(|rule| rule.role);
        match self.guard(required_role) {
            Decision::Render => Navigation::Render {
                path: path.to_string(),
            },
            Decision::RedirectTo {
                target,
                preserve_origin,
            } => Navigation::Redirect {
                to: self.target_path(target).to_string(),
                return_to: preserve_origin.then(|| path.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::authorization::PermissionTable;
    use gatehouse_core::actor::Actor;
    use maplit::btreeset;
    use std::sync::Arc;

    fn routes() -> RouteTable {
        RouteTable::new(vec![
            RouteRule::public("/login"),
            RouteRule::protected("/dashboard"),
            RouteRule::protected("/customer-portal"),
            RouteRule::protected("/finance").with_role(Role::FinanceOfficer),
            RouteRule::protected("/finance/rates"),
            RouteRule::protected("/admin").with_role(Role::Admin),
        ])
    }

    #[test]
    fn test_route_table_prefers_longest_prefix() {
        let table = routes();

        assert_eq!(table.resolve("/finance").unwrap().path, "/finance");
        assert_eq!(
            table.resolve("/finance/approvals/17").unwrap().path,
            "/finance"
        );
        assert_eq!(table.resolve("/finance/rates/").unwrap().path, "/finance/rates");
        assert_eq!(table.resolve("/login?next=/admin").unwrap().path, "/login");
        // Segment match, not string prefix
        assert!(table.resolve("/financed").is_none());
        assert!(table.resolve("/reports").is_none());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/finance/rates/"), "/finance/rates");
        assert_eq!(normalize_path("finance//rates?x=1"), "/finance/rates");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    async fn snapshot(roles: &[Role]) -> AccessSnapshot {
        let table = Arc::new(PermissionTable::with_defaults().await.unwrap());
        let actor = Actor::new("u-1", roles.iter().copied());
        AccessSnapshot::new(Some(Arc::new(actor)), table)
    }

    async fn anonymous() -> AccessSnapshot {
        let table = Arc::new(PermissionTable::with_defaults().await.unwrap());
        AccessSnapshot::new(None, table)
    }

    async fn guard() -> RouteGuard {
        use crate::services::session::{MemoryTokenStore, SessionStore, StaticDirectory};
        use gatehouse_core::settings::directory::DirectorySettings;

        let session = Arc::new(SessionStore::new(
            Arc::new(StaticDirectory::new(&DirectorySettings::default())),
            Arc::new(MemoryTokenStore::default()),
        ));
        let table = Arc::new(PermissionTable::with_defaults().await.unwrap());
        RouteGuard::new(
            AuthorizationEngine::new(session, table),
            ViewSettings::default(),
            btreeset! {Role::Lessee},
            routes(),
        )
    }

    #[tokio::test]
    async fn test_anonymous_always_goes_to_login() {
        let guard = guard().await;
        let anonymous = anonymous().await;
        let login = Decision::RedirectTo {
            target: RedirectTarget::Login,
            preserve_origin: true,
        };

        assert_eq!(guard.decide(&anonymous, None), login);
        for role in Role::all() {
            assert_eq!(guard.decide(&anonymous, Some(role)), login);
        }
    }

    #[tokio::test]
    async fn test_role_mismatch_targets() {
        let guard = guard().await;

        // Admin visiting a lessee view lands on the staff home
        let admin = snapshot(&[Role::Admin]).await;
        assert_eq!(
            guard.decide(&admin, Some(Role::Lessee)),
            Decision::RedirectTo {
                target: RedirectTarget::Home,
                preserve_origin: false
            }
        );

        // Lessee visiting an admin view lands on the customer portal
        let lessee = snapshot(&[Role::Lessee]).await;
        assert_eq!(
            guard.decide(&lessee, Some(Role::Admin)),
            Decision::RedirectTo {
                target: RedirectTarget::CustomerPortal,
                preserve_origin: false
            }
        );

        assert_eq!(guard.decide(&lessee, Some(Role::Lessee)), Decision::Render);
        assert_eq!(guard.decide(&admin, None), Decision::Render);
    }

    #[tokio::test]
    async fn test_role_less_actor_is_treated_as_anonymous() {
        let guard = guard().await;
        let nobody = snapshot(&[]).await;

        assert_eq!(
            guard.decide(&nobody, None),
            Decision::RedirectTo {
                target: RedirectTarget::Login,
                preserve_origin: true
            }
        );
    }

    #[tokio::test]
    async fn test_navigate_for_anonymous_session() {
        let guard = guard().await;

        assert_eq!(
            guard.navigate("/finance/approvals"),
            Navigation::Redirect {
                to: "/login".to_string(),
                return_to: Some("/finance/approvals".to_string()),
            }
        );
        assert_eq!(
            guard.navigate("/login"),
            Navigation::Render {
                path: "/login".to_string()
            }
        );
        // Unregistered paths still need a session
        assert!(matches!(
            guard.navigate("/unknown"),
            Navigation::Redirect { .. }
        ));
    }

    #[test]
    fn test_decision_serializes_with_tag() {
        let json = serde_json::to_value(Decision::RedirectTo {
            target: RedirectTarget::CustomerPortal,
            preserve_origin: false,
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "decision": "redirect_to",
                "target": "customer_portal",
                "preserve_origin": false
            })
        );
    }
}
