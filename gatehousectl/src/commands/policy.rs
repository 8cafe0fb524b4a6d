use gatehouse_core::authorization::Role;
use owo_colors::OwoColorize;

use crate::cli::PolicyShowCommand;
use crate::commands::permissions_table;
use crate::context::AppContext;

pub async fn policy_show(context: &AppContext, cmd: &PolicyShowCommand) -> anyhow::Result<String> {
    let table = context.state().engine.table();
    let roles = match cmd.role {
        Some(role) => vec![role],
        None => Role::all(),
    };

    let mut sections = vec![format!("Mode: {:?}", table.mode())];
    for role in roles {
        let description = table
            .config()
            .roles
            .get(&role)
            .map(|grants| grants.description.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or("no table entry");
        let permissions = table.permissions_for(role);

        let body = if permissions.is_empty() {
            "(nothing granted)".to_string()
        } else {
            permissions_table(&permissions)
        };
        sections.push(format!(
            "{} - {}\n{}",
            role.as_str().bright_blue(),
            description,
            body
        ));
    }

    context.ui().success("Permission table loaded");
    Ok(sections.join("\n\n"))
}
