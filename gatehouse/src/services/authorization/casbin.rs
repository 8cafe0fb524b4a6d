use casbin::{CoreApi, DefaultModel, Enforcer, MemoryAdapter, MgmtApi};
use tracing::{debug, info};

use super::error::PolicyError;
use super::types::PolicyConfig;

/// Casbin model of the permission table: a role is granted an action on a module
pub const MODEL_CONF: &str = r#"
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
"#;

/// Pseudo action used to store the module-visibility table next to the grants
pub const VISIBLE_ACTION: &str = "visible";

/// Casbin-specific operations and policy management
pub struct CasbinManager;

impl CasbinManager {
    /// Build an enforcer holding every grant of the given table
    pub async fn create_enforcer(config: &PolicyConfig) -> Result<Enforcer, PolicyError> {
        let m = DefaultModel::from_str(MODEL_CONF).await?;
        let a = MemoryAdapter::default();
        let mut enforcer = Enforcer::new(m, a).await?;

        Self::sync_policies_to_casbin(&mut enforcer, config).await?;
        Ok(enforcer)
    }

    /// Synchronize the YAML table to Casbin policies, expanding wildcards
    pub async fn sync_policies_to_casbin(
        enforcer: &mut Enforcer,
        config: &PolicyConfig,
    ) -> Result<(), PolicyError> {
        info!("Starting Casbin policy synchronization");

        let _ = enforcer.clear_policy().await;

        let mut rules: Vec<Vec<String>> = Vec::new();
        for (role, grants) in &config.roles {
            for (module, action) in grants.expand() {
                debug!("Adding p: {} {} {}", role, module, action);
                rules.push(vec![
                    role.as_str().to_string(),
                    module.as_str().to_string(),
                    action.as_str().to_string(),
                ]);
            }
        }

        if let Some(visibility) = &config.visibility {
            for (role, modules) in visibility {
                for module in modules.iter().flat_map(|m| m.expand()) {
                    debug!("Adding p: {} {} {}", role, module, VISIBLE_ACTION);
                    rules.push(vec![
                        role.as_str().to_string(),
                        module.as_str().to_string(),
                        VISIBLE_ACTION.to_string(),
                    ]);
                }
            }
        }

        let count = rules.len();
        if !rules.is_empty() {
            enforcer.add_policies(rules).await?;
        }

        info!(
            "Casbin policy synchronization completed with {} rules",
            count
        );
        Ok(())
    }
}
