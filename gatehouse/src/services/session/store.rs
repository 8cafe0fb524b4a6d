use gatehouse_core::actor::{Actor, Credentials};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::identity::IdentityProvider;
use super::token_store::TokenStore;
use super::AuthenticationError;

/// Who is acting right now
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Arc<Actor>),
}

impl Session {
    pub fn actor(&self) -> Option<&Arc<Actor>> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(actor) => Some(actor),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

/// Published state of a [`SessionStore`].
///
/// `generation` increases on every login attempt, restore attempt and logout.
/// A pending operation may only publish its result while the generation it
/// started with is still current.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub session: Session,
    pub generation: u64,
}

/// Single source of truth for the current actor.
///
/// Reads are synchronous snapshots. Login and restore are async and never
/// expose a half-finished session: until they commit, readers see the
/// previous state.
///
/// Token persistence happens while the state is locked for the commit or the
/// logout, so readers wait for that write. Use a fast [`TokenStore`].
pub struct SessionStore {
    state: watch::Sender<SessionState>,
    identity: Arc<dyn IdentityProvider>,
    tokens: Arc<dyn TokenStore>,
}

impl SessionStore {
    pub fn new(identity: Arc<dyn IdentityProvider>, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state,
            identity,
            tokens,
        }
    }

    pub fn session(&self) -> Session {
        self.state.borrow().session.clone()
    }

    pub fn current_actor(&self) -> Option<Arc<Actor>> {
        self.state.borrow().session.actor().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().session.is_authenticated()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Receiver notified whenever the session changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Authenticate against the identity directory and, on success, replace
    /// the current session. A failed login leaves the previous session as is.
    pub async fn login(&self, credentials: &Credentials) -> Result<Arc<Actor>, AuthenticationError> {
        let ticket = self.begin_transition();
        debug!(generation = ticket, "Login started for {}", credentials.email);

        let authenticated = match self.identity.authenticate(credentials).await {
            Ok(authenticated) => authenticated,
            Err(e) => {
                warn!("Login failed for {}: {}", credentials.email, e);
                return Err(e);
            }
        };

        if !authenticated.actor.has_grantable_role() {
            warn!(
                "Login rejected for {}: account has no roles",
                credentials.email
            );
            return Err(AuthenticationError::NoRoles);
        }

        let actor = Arc::new(authenticated.actor);
        let token = authenticated.token;
        let committed = self.commit(ticket, Session::Authenticated(actor.clone()), |tokens| {
            if let Err(e) = tokens.save(&token) {
                warn!("Failed to persist session token: {}", e);
            }
            true
        });

        if !committed {
            info!(
                "Login for {} superseded by a newer session change, discarding",
                actor.id
            );
            return Err(AuthenticationError::Superseded);
        }

        info!(
            "Logged in as {} with roles {:?}",
            actor.id,
            actor.roles.iter().map(|r| r.as_str()).collect::<Vec<_>>()
        );
        Ok(actor)
    }

    /// Return to the anonymous state and forget the persisted token.
    /// Any login or restore still in flight will not take effect.
    pub fn logout(&self) {
        let was_authenticated = self.state.send_if_modified(|state| {
            state.generation += 1;
            if let Err(e) = self.tokens.clear() {
                warn!("Failed to clear persisted session token: {}", e);
            }
            let changed = state.session.is_authenticated();
            state.session = Session::Anonymous;
            changed
        });

        if was_authenticated {
            info!("Logged out");
        } else {
            debug!("Logout on an anonymous session");
        }
    }

    /// Re-establish the session from the persisted token, if any.
    ///
    /// Never fails: a missing, unreadable or rejected token leaves the
    /// session anonymous. Unreadable and rejected tokens are removed.
    pub async fn restore_session(&self) -> Option<Arc<Actor>> {
        // Ticket first, so a login committing while the token is read wins
        let ticket = self.begin_transition();
        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No persisted session token");
                return None;
            }
            Err(e) => {
                warn!("Could not read persisted session token, discarding: {}", e);
                self.discard_token(ticket);
                return None;
            }
        };

        let actor = match self.identity.resume(&token).await {
            Some(actor) if actor.has_grantable_role() => Arc::new(actor),
            Some(actor) => {
                warn!("Persisted session for {} has no roles, discarding", actor.id);
                self.discard_token(ticket);
                return None;
            }
            None => {
                info!("Persisted session token was rejected, staying anonymous");
                self.discard_token(ticket);
                return None;
            }
        };

        let committed = self.commit(ticket, Session::Authenticated(actor.clone()), |tokens| {
            matches!(tokens.load(), Ok(Some(current)) if current == token)
        });
        if committed {
            info!("Restored session for {}", actor.id);
            Some(actor)
        } else {
            debug!("Session restore superseded, discarding");
            None
        }
    }

    fn begin_transition(&self) -> u64 {
        let mut ticket = 0;
        // Bump without notifying; the visible session is unchanged
        self.state.send_if_modified(|state| {
            state.generation += 1;
            ticket = state.generation;
            false
        });
        ticket
    }

    /// Publish `session` if no other transition started since `ticket` and
    /// `persist` agrees. `persist` runs under the same lock, so it cannot race
    /// a logout.
    fn commit(
        &self,
        ticket: u64,
        session: Session,
        persist: impl FnOnce(&dyn TokenStore) -> bool,
    ) -> bool {
        self.state.send_if_modified(|state| {
            if state.generation != ticket || !persist(self.tokens.as_ref()) {
                return false;
            }
            state.session = session;
            true
        })
    }

    fn discard_token(&self, ticket: u64) {
        self.state.send_if_modified(|state| {
            if state.generation == ticket {
                if let Err(e) = self.tokens.clear() {
                    warn!("Failed to clear rejected session token: {}", e);
                }
            }
            false
        });
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SessionStore")
            .field("session", &state.session)
            .field("generation", &state.generation)
            .finish_non_exhaustive()
    }
}
