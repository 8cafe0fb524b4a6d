use gatehouse_core::authorization::{ModuleAccess, PermissionAction, Role};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// How the permission table treats roles it has no entry for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Missing entries deny. The only production setting.
    #[default]
    Strict,
    /// Development stub: a role without any table entry is allowed every
    /// module and action.
    Permissive,
}

/// Represents either a specific action or wildcard (*)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActionOrWildcard {
    Action(PermissionAction),
    Wildcard,
}

impl ActionOrWildcard {
    pub fn expand(&self) -> Vec<PermissionAction> {
        match self {
            ActionOrWildcard::Action(action) => vec![*action],
            ActionOrWildcard::Wildcard => PermissionAction::all(),
        }
    }
}

/// Represents either a specific module or wildcard (*)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModuleOrWildcard {
    Module(ModuleAccess),
    Wildcard,
}

impl ModuleOrWildcard {
    pub fn expand(&self) -> Vec<ModuleAccess> {
        match self {
            ModuleOrWildcard::Module(module) => vec![*module],
            ModuleOrWildcard::Wildcard => ModuleAccess::all(),
        }
    }
}

impl Serialize for ActionOrWildcard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionOrWildcard::Action(action) => serializer.serialize_str(action.as_str()),
            ActionOrWildcard::Wildcard => serializer.serialize_str("*"),
        }
    }
}

impl<'de> Deserialize<'de> for ActionOrWildcard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "*" {
            return Ok(ActionOrWildcard::Wildcard);
        }
        // Unknown actions are an error, never widened to a wildcard
        PermissionAction::from_str(&s)
            .map(ActionOrWildcard::Action)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown permission action '{s}'")))
    }
}

impl Serialize for ModuleOrWildcard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ModuleOrWildcard::Module(module) => serializer.serialize_str(module.as_str()),
            ModuleOrWildcard::Wildcard => serializer.serialize_str("*"),
        }
    }
}

impl<'de> Deserialize<'de> for ModuleOrWildcard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "*" {
            return Ok(ModuleOrWildcard::Wildcard);
        }
        ModuleAccess::from_str(&s)
            .map(ModuleOrWildcard::Module)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown module '{s}'")))
    }
}

/// Grants of a single role, keyed by module
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleGrants {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub grants: BTreeMap<ModuleOrWildcard, Vec<ActionOrWildcard>>,
}

impl RoleGrants {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            grants: BTreeMap::new(),
        }
    }

    pub fn grant(mut self, module: ModuleOrWildcard, actions: &[ActionOrWildcard]) -> Self {
        self.grants
            .entry(module)
            .or_default()
            .extend_from_slice(actions);
        self
    }

    /// Expand wildcards into concrete (module, action) pairs
    pub fn expand(&self) -> BTreeSet<(ModuleAccess, PermissionAction)> {
        let mut pairs = BTreeSet::new();
        for (module, actions) in &self.grants {
            for module in module.expand() {
                for action in actions {
                    for action in action.expand() {
                        pairs.insert((module, action));
                    }
                }
            }
        }
        pairs
    }
}

/// Permission table loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyConfig {
    #[serde(default)]
    pub mode: PolicyMode,
    #[serde(default)]
    pub roles: BTreeMap<Role, RoleGrants>,
    /// Dedicated module-visibility table. When absent, a module is visible
    /// to whoever may read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<BTreeMap<Role, Vec<ModuleOrWildcard>>>,
}

/// Effective grants, grouped by module
pub type EffectivePermissions = BTreeMap<ModuleAccess, BTreeSet<PermissionAction>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parses_wildcards() {
        let yaml = r#"
mode: strict
roles:
  admin:
    description: Administrator
    grants:
      "*": ["*"]
  finance_officer:
    grants:
      finance: [read, write, approve]
      dashboard: [read]
visibility:
  lessee: [dashboard, loans]
"#;
        let config: PolicyConfig = serde_norway::from_str(yaml).unwrap();

        assert_eq!(config.mode, PolicyMode::Strict);
        let admin = config.roles.get(&Role::Admin).unwrap().expand();
        assert_eq!(
            admin.len(),
            ModuleAccess::all().len() * PermissionAction::all().len()
        );

        let finance = config.roles.get(&Role::FinanceOfficer).unwrap().expand();
        assert!(finance.contains(&(ModuleAccess::Finance, PermissionAction::Approve)));
        assert!(!finance.contains(&(ModuleAccess::Finance, PermissionAction::Delete)));
        assert!(!finance.contains(&(ModuleAccess::Dashboard, PermissionAction::Write)));

        let visibility = config.visibility.unwrap();
        assert_eq!(
            visibility.get(&Role::Lessee).unwrap(),
            &vec![
                ModuleOrWildcard::Module(ModuleAccess::Dashboard),
                ModuleOrWildcard::Module(ModuleAccess::Loans)
            ]
        );
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let unknown_action = r#"
roles:
  officer:
    grants:
      loans: [read, sign]
"#;
        assert!(serde_norway::from_str::<PolicyConfig>(unknown_action).is_err());

        let unknown_module = r#"
roles:
  officer:
    grants:
      treasury: [read]
"#;
        assert!(serde_norway::from_str::<PolicyConfig>(unknown_module).is_err());

        let unknown_role = r#"
roles:
  superuser:
    grants:
      loans: [read]
"#;
        assert!(serde_norway::from_str::<PolicyConfig>(unknown_role).is_err());
    }

    #[test]
    fn test_mode_defaults_to_strict() {
        let config: PolicyConfig = serde_norway::from_str("roles: {}").unwrap();
        assert_eq!(config.mode, PolicyMode::Strict);
        assert!(config.visibility.is_none());
    }
}
