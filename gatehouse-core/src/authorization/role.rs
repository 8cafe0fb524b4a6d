use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles an actor can hold. An actor may hold several at once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Officer,
    Customer,
    FinanceOfficer,
    ZonalAdmin,
    /// Customer-class role, served by the customer portal
    Lessee,
}

impl Role {
    pub fn all() -> Vec<Role> {
        vec![
            Role::Admin,
            Role::Manager,
            Role::Officer,
            Role::Customer,
            Role::FinanceOfficer,
            Role::ZonalAdmin,
            Role::Lessee,
        ]
    }

    /// Convert to string for Casbin policy
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Officer => "officer",
            Role::Customer => "customer",
            Role::FinanceOfficer => "finance_officer",
            Role::ZonalAdmin => "zonal_admin",
            Role::Lessee => "lessee",
        }
    }

    /// Parse from string. Unknown names are rejected rather than mapped to a default.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "officer" => Some(Role::Officer),
            "customer" => Some(Role::Customer),
            "finance_officer" => Some(Role::FinanceOfficer),
            "zonal_admin" => Some(Role::ZonalAdmin),
            "lessee" => Some(Role::Lessee),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
