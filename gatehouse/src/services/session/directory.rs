use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use gatehouse_core::actor::{Actor, Credentials, SessionToken};
use gatehouse_core::settings::directory::{DirectorySettings, DirectoryUser};
use gatehouse_core::utils::secret::MaskedSecret;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use uuid::Uuid;

use super::identity::{Authenticated, IdentityProvider};
use super::AuthenticationError;

const TOKEN_VERSION: &str = "gh1";

/// Identity directory backed by the users listed in the settings.
///
/// Passwords are checked against bcrypt hashes. Continuation tokens have the
/// form `gh1.<base64url(id)>.<nonce>.<signature>` where the signature is
/// `base64url(sha256(secret:id:nonce))`.
pub struct StaticDirectory {
    users: Vec<DirectoryUser>,
    token_secret: MaskedSecret,
}

impl StaticDirectory {
    pub fn new(settings: &DirectorySettings) -> Self {
        let token_secret = if settings.token_secret.is_empty() {
            warn!("No directory token_secret configured, sessions will not survive a restart");
            MaskedSecret::new(Uuid::new_v4().simple().to_string())
        } else {
            settings.token_secret.clone()
        };

        Self {
            users: settings.users.clone(),
            token_secret,
        }
    }

    fn find_by_email(&self, email: &str) -> Option<&DirectoryUser> {
        let email = email.trim();
        self.users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
    }

    fn find_by_id(&self, id: &str) -> Option<&DirectoryUser> {
        self.users.iter().find(|user| user.id == id)
    }

    fn to_actor(user: &DirectoryUser) -> Actor {
        Actor {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            region: user.region.clone(),
        }
    }

    fn signature(&self, user_id: &str, nonce: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.token_secret.expose_secret().as_bytes());
        hasher.update(b":");
        hasher.update(user_id.as_bytes());
        hasher.update(b":");
        hasher.update(nonce.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    pub fn issue_token(&self, user_id: &str) -> SessionToken {
        let nonce = Uuid::new_v4().simple().to_string();
        let signature = self.signature(user_id, &nonce);
        SessionToken::new(format!(
            "{}.{}.{}.{}",
            TOKEN_VERSION,
            URL_SAFE_NO_PAD.encode(user_id),
            nonce,
            signature
        ))
    }

    /// Returns the user id a token was issued for, if the token is intact
    pub fn verify_token(&self, token: &SessionToken) -> Option<String> {
        let mut parts = token.expose_secret().split('.');
        let (version, encoded_id, nonce, signature) =
            (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || version != TOKEN_VERSION {
            return None;
        }
        Uuid::try_parse(nonce).ok()?;

        let user_id = String::from_utf8(URL_SAFE_NO_PAD.decode(encoded_id).ok()?).ok()?;
        let expected = self.signature(&user_id, nonce);
        if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
            Some(user_id)
        } else {
            None
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticDirectory {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Authenticated, AuthenticationError> {
        let user = self.find_by_email(&credentials.email);
        if user.is_none() {
            debug!("No directory entry for {}", credentials.email);
        }

        // Unknown emails still pay for a bcrypt verify so latency does not
        // reveal which accounts exist
        let Some(hash) = user.or(self.users.first()).map(|u| u.password_hash.clone()) else {
            return Err(AuthenticationError::InvalidCredentials);
        };
        let password = credentials.password.expose_secret().to_string();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthenticationError::DirectoryUnavailable(e.to_string()))?;

        let Some(user) = user else {
            return Err(AuthenticationError::InvalidCredentials);
        };
        match verified {
            Ok(true) => Ok(Authenticated {
                actor: Self::to_actor(user),
                token: self.issue_token(&user.id),
            }),
            Ok(false) => Err(AuthenticationError::InvalidCredentials),
            Err(e) => {
                warn!("Unusable password hash for user {}: {}", user.id, e);
                Err(AuthenticationError::InvalidCredentials)
            }
        }
    }

    async fn resume(&self, token: &SessionToken) -> Option<Actor> {
        let Some(user_id) = self.verify_token(token) else {
            debug!("Rejected continuation token {}", token);
            return None;
        };
        self.find_by_id(&user_id).map(Self::to_actor)
    }
}

impl std::fmt::Debug for StaticDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticDirectory")
            .field("users", &self.users.len())
            .finish_non_exhaustive()
    }
}
