pub mod module;
pub mod permission;
pub mod role;

pub use module::ModuleAccess;
pub use permission::PermissionAction;
pub use role::Role;
