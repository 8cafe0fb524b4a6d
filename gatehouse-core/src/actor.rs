use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::authorization::Role;
use crate::utils::secret::MaskedSecret;

/// The signed-in user whose permissions are evaluated.
///
/// `name`, `email` and `region` are display attributes only; no access
/// decision reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
    #[serde(default)]
    pub region: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            email: String::new(),
            id,
            roles: roles.into_iter().collect(),
            region: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role<'a>(&self, roles: impl IntoIterator<Item = &'a Role>) -> bool {
        roles.into_iter().any(|role| self.roles.contains(role))
    }

    /// An actor without roles has nothing that could be granted.
    pub fn has_grantable_role(&self) -> bool {
        !self.roles.is_empty()
    }
}

/// Email/password pair handed to the identity directory on login
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: MaskedSecret,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: MaskedSecret::new(password.into()),
        }
    }
}

/// Opaque continuation token persisted between process runs.
/// Only its presence matters outside the identity directory that minted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(MaskedSecret);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(MaskedSecret::new(value.into()))
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
