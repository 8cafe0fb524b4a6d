//! Role/permission decisions
//!
//! The permission table is a YAML file of per-role grants compiled into a
//! Casbin enforcer. [`AuthorizationEngine`] answers role and permission
//! questions about whoever the [`SessionStore`](crate::services::session::SessionStore)
//! currently holds.

pub mod casbin;
pub mod config;
pub mod engine;
pub mod error;
pub mod service;
pub mod types;


pub use engine::{AccessSnapshot, AuthorizationEngine};
pub use error::PolicyError;
pub use service::PermissionTable;
pub use types::{EffectivePermissions, PolicyConfig, PolicyMode, RoleGrants};
