use serde::{Deserialize, Serialize};

use crate::authorization::Role;

/// Registration of a protected (or public) view
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub path: String,
    /// Public routes render for everyone, including anonymous visitors
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub role: Option<Role>,
}

impl RouteRule {
    pub fn protected(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            public: false,
            role: None,
        }
    }

    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            public: true,
            role: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}
