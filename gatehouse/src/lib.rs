//! gatehouse library
//!
//! Decides which dashboard views, modules and in-page elements the signed-in
//! actor may reach. The CLI in `gatehousectl` is a thin layer over
//! [`AppState`].

pub mod app_state;
pub mod guard;
pub mod init_telemetry;
pub mod services;
pub mod settings;

pub use app_state::{AppState, SharedAppState};
