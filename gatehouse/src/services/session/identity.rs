use async_trait::async_trait;
use gatehouse_core::actor::{Actor, Credentials, SessionToken};

use super::AuthenticationError;

/// Result of a successful credential check
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub actor: Actor,
    /// Continuation token to persist for [`IdentityProvider::resume`]
    pub token: SessionToken,
}

/// Source of identities. The session store never inspects tokens itself.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check credentials and return the matching actor
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Authenticated, AuthenticationError>;

    /// Re-establish an actor from a persisted token.
    /// Unknown, expired or tampered tokens yield `None`.
    async fn resume(&self, token: &SessionToken) -> Option<Actor>;
}
