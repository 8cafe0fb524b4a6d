pub mod access;
pub mod auth;
pub mod directory;
pub mod policy;

use gatehouse::services::authorization::EffectivePermissions;
use tabled::{builder::Builder, settings::Style};

/// Module/actions table shared by `auth:status` and `policy:show`
pub(crate) fn permissions_table(permissions: &EffectivePermissions) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Module", "Actions"]);
    for (module, actions) in permissions {
        let actions: Vec<&str> = actions.iter().map(|a| a.as_str()).collect();
        builder.push_record([module.as_str().to_string(), actions.join(", ")]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
