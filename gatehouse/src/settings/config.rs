use config::{Config, ConfigError, Environment, File};
use gatehouse_core::authorization::Role;
use gatehouse_core::settings::{
    directory::DirectorySettings, routes::RouteRule, session::SessionSettings,
    views::ViewSettings,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::env;
use std::path::{Path, PathBuf};

use crate::guard::route::{normalize_path, RouteTable};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Fallback filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub views: ViewSettings,
    /// Roles redirected to the customer portal instead of the staff home
    #[serde(default = "default_customer_roles")]
    pub customer_roles: BTreeSet<Role>,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteRule>,
    #[serde(default = "default_policy_file")]
    pub policy_file: PathBuf,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_customer_roles() -> BTreeSet<Role> {
    BTreeSet::from([Role::Lessee])
}

fn default_policy_file() -> PathBuf {
    PathBuf::from("config/policy.yaml")
}

fn default_routes() -> Vec<RouteRule> {
    vec![
        RouteRule::public("/login"),
        RouteRule::protected("/dashboard"),
        RouteRule::protected("/customer-portal"),
        RouteRule::protected("/applications"),
        RouteRule::protected("/loans"),
        RouteRule::protected("/customers"),
        RouteRule::protected("/reports"),
        RouteRule::protected("/finance").with_role(Role::FinanceOfficer),
        RouteRule::protected("/zones").with_role(Role::ZonalAdmin),
        RouteRule::protected("/settings").with_role(Role::Admin),
        RouteRule::protected("/users").with_role(Role::Admin),
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_level: default_log_level(),
            views: ViewSettings::default(),
            customer_roles: default_customer_roles(),
            routes: default_routes(),
            policy_file: default_policy_file(),
            session: SessionSettings::default(),
            directory: DirectorySettings::default(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsValidationError {
    #[error("Login view {0} must be registered as a public route")]
    LoginNotPublic(String),
    #[error("View {path} is a redirect target and must not require role {role}")]
    RedirectTargetRequiresRole { path: String, role: Role },
    #[error("Route {0} is registered more than once")]
    DuplicateRoute(String),
    #[error("directory.token_secret is required when directory users are configured")]
    MissingTokenSecret,
    #[error("Directory user id {0} is used more than once")]
    DuplicateUser(String),
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("GATEHOUSE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Layered configuration: `config/default`, `config/{GATEHOUSE_RUN_MODE}`,
    /// `config/local`, then `GATEHOUSE__*` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("GATEHOUSE_RUN_MODE").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("log_level", default_log_level())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment())
            .build()?
            .try_deserialize()
    }

    /// A single explicit file, still overridable from the environment
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("log_level", default_log_level())?
            .add_source(File::from(path))
            .add_source(Self::get_environment())
            .build()?
            .try_deserialize()
    }

    /// Reject configurations that could redirect in a loop or
    /// sign tokens with no secret.
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        let mut seen = HashSet::new();
        for route in &self.routes {
            let path = normalize_path(&route.path);
            if !seen.insert(path.clone()) {
                return Err(SettingsValidationError::DuplicateRoute(path));
            }
        }

        let table = RouteTable::new(self.routes.clone());
        if !table
            .resolve(&self.views.login)
            .is_some_and(|rule| rule.public)
        {
            return Err(SettingsValidationError::LoginNotPublic(
                self.views.login.clone(),
            ));
        }

        for target in [&self.views.home, &self.views.customer_portal] {
            if let Some(role) = table.resolve(target).and_then(|rule| rule.role) {
                return Err(SettingsValidationError::RedirectTargetRequiresRole {
                    path: target.clone(),
                    role,
                });
            }
        }

        if !self.directory.users.is_empty() && self.directory.token_secret.is_empty() {
            return Err(SettingsValidationError::MissingTokenSecret);
        }

        let mut ids = HashSet::new();
        for user in &self.directory.users {
            if !ids.insert(user.id.as_str()) {
                return Err(SettingsValidationError::DuplicateUser(user.id.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::settings::directory::DirectoryUser;
    use gatehouse_core::utils::secret::MaskedSecret;
    use maplit::btreeset;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.customer_roles, btreeset! {Role::Lessee});
        assert_eq!(settings.views.login, "/login");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r#"
log_level: debug
views:
  home: /overview
customer_roles: [lessee, customer]
routes:
  - path: /login
    public: true
  - path: /overview
  - path: /customer-portal
  - path: /finance
    role: finance_officer
policy_file: /etc/gatehouse/policy.yaml
session:
  token_file: /tmp/gatehouse-session.json
directory:
  token_secret: from-file-secret
  users:
    - id: u-1
      name: Farah
      email: farah@example.com
      password_hash: "$2b$04$invalid"
      roles: [finance_officer]
"#
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.views.home, "/overview");
        assert_eq!(settings.views.login, "/login");
        assert_eq!(
            settings.customer_roles,
            btreeset! {Role::Lessee, Role::Customer}
        );
        assert_eq!(
            settings.routes[3],
            RouteRule::protected("/finance").with_role(Role::FinanceOfficer)
        );
        assert_eq!(settings.policy_file, PathBuf::from("/etc/gatehouse/policy.yaml"));
        assert_eq!(
            settings.session.token_file,
            PathBuf::from("/tmp/gatehouse-session.json")
        );
        assert_eq!(
            settings.directory.token_secret.expose_secret(),
            "from-file-secret"
        );
        assert_eq!(settings.directory.users[0].roles, btreeset! {Role::FinanceOfficer});
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_login_view_must_be_public() {
        let mut settings = Settings::default();
        settings.routes[0] = RouteRule::protected("/login");

        assert_eq!(
            settings.validate(),
            Err(SettingsValidationError::LoginNotPublic("/login".to_string()))
        );
    }

    #[test]
    fn test_redirect_targets_must_not_require_a_role() {
        let mut settings = Settings::default();
        settings.routes[2] = RouteRule::protected("/customer-portal").with_role(Role::Lessee);

        assert!(matches!(
            settings.validate(),
            Err(SettingsValidationError::RedirectTargetRequiresRole {
                role: Role::Lessee,
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_routes_are_rejected() {
        let mut settings = Settings::default();
        settings.routes.push(RouteRule::protected("/finance/"));

        assert_eq!(
            settings.validate(),
            Err(SettingsValidationError::DuplicateRoute("/finance".to_string()))
        );
    }

    #[test]
    fn test_users_need_a_token_secret() {
        let user = DirectoryUser {
            id: "u-1".to_string(),
            name: "Olga".to_string(),
            email: "olga@example.com".to_string(),
            password_hash: String::new(),
            roles: btreeset! {Role::Officer},
            region: None,
        };
        let mut settings = Settings::default();
        settings.directory.users = vec![user.clone()];
        assert_eq!(
            settings.validate(),
            Err(SettingsValidationError::MissingTokenSecret)
        );

        settings.directory.token_secret = MaskedSecret::new("s".to_string());
        assert_eq!(settings.validate(), Ok(()));

        settings.directory.users.push(user);
        assert_eq!(
            settings.validate(),
            Err(SettingsValidationError::DuplicateUser("u-1".to_string()))
        );
    }
}
