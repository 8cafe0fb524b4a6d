use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::authorization::Role;
use crate::utils::secret::MaskedSecret;

/// A user known to the static identity directory
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DirectoryUser {
    pub id: String,
    pub name: String,
    pub email: String,
    /// bcrypt hash of the user's password
    pub password_hash: String,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DirectorySettings {
    /// Secret used to sign continuation tokens. Rotating it invalidates all
    /// persisted sessions.
    #[serde(default = "empty_secret")]
    pub token_secret: MaskedSecret,
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
}

fn empty_secret() -> MaskedSecret {
    MaskedSecret::new(String::new())
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            token_secret: empty_secret(),
            users: Vec::new(),
        }
    }
}
