use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::guard::{RenderGate, RouteGuard, RouteTable};
use crate::services::authorization::{AuthorizationEngine, PermissionTable};
use crate::services::session::{FileTokenStore, SessionStore, StaticDirectory};
use crate::settings::config::Settings;

/// Everything a consumer needs, wired from one [`Settings`].
/// All components share the same session store and permission table.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub session: Arc<SessionStore>,
    pub tokens: Arc<FileTokenStore>,
    pub engine: AuthorizationEngine,
    pub route_guard: RouteGuard,
    pub render_gate: RenderGate,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    /// Load the layered configuration and wire the state
    pub async fn new() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new().context("Failed to load gatehouse settings")?;
        Self::from_settings(settings).await
    }

    pub async fn from_settings(settings: Settings) -> anyhow::Result<SharedAppState> {
        settings
            .validate()
            .context("Invalid gatehouse settings")?;

        // A broken policy file stops startup; a missing one falls back to defaults
        let table = PermissionTable::load(&settings.policy_file)
            .await
            .with_context(|| {
                format!(
                    "Failed to load permission table {}",
                    settings.policy_file.display()
                )
            })?;
        let table = Arc::new(table);

        let directory = Arc::new(StaticDirectory::new(&settings.directory));
        let tokens = Arc::new(FileTokenStore::new(&settings.session.token_file));
        let session = Arc::new(SessionStore::new(directory, tokens.clone()));

        let engine = AuthorizationEngine::new(session.clone(), table);
        let route_guard = RouteGuard::new(
            engine.clone(),
            settings.views.clone(),
            settings.customer_roles.clone(),
            RouteTable::new(settings.routes.clone()),
        );
        let render_gate = RenderGate::new(engine.clone());

        info!(
            "gatehouse ready: {} routes, {} directory users, token file {}",
            settings.routes.len(),
            settings.directory.users.len(),
            settings.session.token_file.display()
        );

        Ok(Arc::new(AppState {
            settings,
            session,
            tokens,
            engine,
            route_guard,
            render_gate,
        }))
    }
}
