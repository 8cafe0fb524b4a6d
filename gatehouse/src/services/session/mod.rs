//! Session lifecycle: who is currently acting, how they got there and how the
//! session survives a restart.

pub mod directory;
pub mod identity;
pub mod store;
pub mod token_store;

pub use directory::StaticDirectory;
pub use identity::{Authenticated, IdentityProvider};
pub use store::{Session, SessionState, SessionStore};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};

#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account has no roles assigned")]
    NoRoles,
    #[error("Identity directory unavailable: {0}")]
    DirectoryUnavailable(String),
    #[error("Login superseded by a newer login or logout")]
    Superseded,
}
