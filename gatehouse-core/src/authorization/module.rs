use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional areas of the dashboard that are subject to access control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ModuleAccess {
    Dashboard,
    Applications,
    Loans,
    Finance,
    Customers,
    Reports,
    Settings,
    Users,
}

impl ModuleAccess {
    pub fn all() -> Vec<ModuleAccess> {
        vec![
            ModuleAccess::Dashboard,
            ModuleAccess::Applications,
            ModuleAccess::Loans,
            ModuleAccess::Finance,
            ModuleAccess::Customers,
            ModuleAccess::Reports,
            ModuleAccess::Settings,
            ModuleAccess::Users,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleAccess::Dashboard => "dashboard",
            ModuleAccess::Applications => "applications",
            ModuleAccess::Loans => "loans",
            ModuleAccess::Finance => "finance",
            ModuleAccess::Customers => "customers",
            ModuleAccess::Reports => "reports",
            ModuleAccess::Settings => "settings",
            ModuleAccess::Users => "users",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<ModuleAccess> {
        match s.to_lowercase().as_str() {
            "dashboard" => Some(ModuleAccess::Dashboard),
            "applications" => Some(ModuleAccess::Applications),
            "loans" => Some(ModuleAccess::Loans),
            "finance" => Some(ModuleAccess::Finance),
            "customers" => Some(ModuleAccess::Customers),
            "reports" => Some(ModuleAccess::Reports),
            "settings" => Some(ModuleAccess::Settings),
            "users" => Some(ModuleAccess::Users),
            _ => None,
        }
    }
}

impl fmt::Display for ModuleAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
