use anyhow::Context;
use gatehouse::settings::Settings;
use gatehouse::{AppState, SharedAppState};
use std::path::Path;
use std::sync::Arc;

use crate::ui::Ui;

/// Load settings from an explicit file or the layered defaults
pub fn load_settings(config: Option<&Path>) -> anyhow::Result<Settings> {
    match config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to read configuration {}", path.display())),
        None => Settings::new().context("Failed to read configuration"),
    }
}

/// AppContext provides access to shared application resources
pub struct AppContext {
    /// UI instance for managing terminal output
    pub ui: Arc<Ui>,
    /// Wired access-control state
    pub state: SharedAppState,
}

impl AppContext {
    pub async fn new(settings: Settings, ui: Ui) -> anyhow::Result<Self> {
        let state = AppState::from_settings(settings).await?;
        Ok(AppContext {
            ui: Arc::new(ui),
            state,
        })
    }

    /// Get a reference to the UI
    pub fn ui(&self) -> &Arc<Ui> {
        &self.ui
    }

    pub fn state(&self) -> &SharedAppState {
        &self.state
    }

    /// Pick up the session stored by a previous `auth:login`
    pub async fn restore(&self) {
        self.state.session.restore_session().await;
    }
}
