use anyhow::Context;
use gatehouse_core::actor::{Actor, Credentials};
use owo_colors::OwoColorize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::AuthLoginCommand;
use crate::commands::permissions_table;
use crate::context::AppContext;

fn describe(actor: &Actor) -> String {
    let roles: Vec<&str> = actor.roles.iter().map(|r| r.as_str()).collect();
    format!(
        "{} <{}> ({})",
        actor.name.bright_green(),
        actor.email.bright_cyan(),
        roles.join(", ")
    )
}

pub async fn auth_login(context: &AppContext, cmd: &AuthLoginCommand) -> anyhow::Result<String> {
    let ui = context.ui();
    let password = cmd
        .password
        .clone()
        .context("Password required: pass --password or set GATEHOUSE_PASSWORD")?;

    ui.new_status_line(format!("Logging in as {} ...", cmd.email.bright_blue()));
    match context
        .state()
        .session
        .login(&Credentials::new(&cmd.email, password))
        .await
    {
        Ok(actor) => {
            ui.success(format!("Logged in as {}", describe(&actor)));
            Ok(String::new())
        }
        Err(e) => {
            ui.failed(e.to_string());
            Err(e.into())
        }
    }
}

pub async fn auth_logout(context: &AppContext) -> anyhow::Result<String> {
    context.state().session.logout();
    context.ui().success("Logged out");
    Ok(String::new())
}

pub async fn auth_status(context: &AppContext) -> anyhow::Result<String> {
    let state = context.state();
    let Some(actor) = state.session.restore_session().await else {
        context.ui().failed("Not logged in");
        return Ok(format!(
            "Run {} to start a session",
            "gatehousectl auth:login --email <email>".bright_blue()
        ));
    };

    let mut builder = Builder::default();
    builder.push_record(["Id", actor.id.as_str()]);
    builder.push_record(["Name", actor.name.as_str()]);
    builder.push_record(["Email", actor.email.as_str()]);
    let roles: Vec<&str> = actor.roles.iter().map(|r| r.as_str()).collect();
    builder.push_record(["Roles".to_string(), roles.join(", ")]);
    builder.push_record(["Region", actor.region.as_deref().unwrap_or("-")]);
    if let Ok(Some(record)) = state.tokens.load_record() {
        builder.push_record([
            "Session saved".to_string(),
            record
                .saved_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ]);
    }
    let mut info = builder.build();
    info.with(Style::rounded());

    context
        .ui()
        .success(format!("Logged in as {}", describe(&actor)));
    Ok(format!(
        "{}\n{}",
        info,
        permissions_table(&state.engine.effective_permissions())
    ))
}
