//! Secret values (passwords, session tokens, signing secrets) that never show
//! up in full in `Debug`/`Display` output.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A secret string that is zeroized on drop and partially masked when printed.
///
/// # Example
/// ```
/// use gatehouse_core::utils::secret::MaskedSecret;
///
/// let token = MaskedSecret::new("gh1.YWxpY2U.0000-1111".to_string());
/// assert_eq!(format!("{}", token), "*****************1111");
/// assert_eq!(token.expose_secret(), "gh1.YWxpY2U.0000-1111");
/// ```
#[derive(Clone)]
pub struct MaskedSecret(SecretString);

impl MaskedSecret {
    pub fn new(value: String) -> Self {
        Self(SecretString::new(value.into_boxed_str()))
    }

    /// Expose the secret value. Only call this where the raw value is consumed
    /// (hashing, verification, persisting a token).
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

/// Mask all but the tail of a value.
/// Values shorter than 12 chars keep 2 visible chars, longer ones keep 4.
pub fn mask_value(value: &str) -> String {
    let len = value.chars().count();
    let visible = if len >= 12 { 4 } else { 2.min(len) };
    let hidden = len - visible;

    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { '*' } else { c })
        .collect()
}

impl std::fmt::Debug for MaskedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", mask_value(self.0.expose_secret()))
    }
}

impl std::fmt::Display for MaskedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", mask_value(self.0.expose_secret()))
    }
}

impl Serialize for MaskedSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Full value: the token file needs the real token to restore a session.
        self.0.expose_secret().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MaskedSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(MaskedSecret::new(value))
    }
}

impl PartialEq for MaskedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for MaskedSecret {}
