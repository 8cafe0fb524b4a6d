use gatehouse::guard::{Navigation, Requirement};
use gatehouse_core::access::requests::{GateCheckRequest, PermissionCheckRequest, RouteCheckRequest};
use owo_colors::OwoColorize;

use crate::context::AppContext;

fn verdict(allowed: bool) -> String {
    if allowed {
        "allow".green().to_string()
    } else {
        "deny".red().to_string()
    }
}

fn who(context: &AppContext) -> String {
    context
        .state()
        .session
        .current_actor()
        .map(|actor| actor.id.clone())
        .unwrap_or_else(|| "anonymous".to_string())
}

pub async fn access_route(context: &AppContext, cmd: &RouteCheckRequest) -> anyhow::Result<String> {
    context.restore().await;
    context.ui().new_status_line(format!(
        "Navigating to {} as {} ...",
        cmd.path.bright_blue(),
        who(context)
    ));

    let output = match context.state().route_guard.navigate(&cmd.path) {
        Navigation::Render { path } => format!("{} {}", "render".green(), path),
        Navigation::Redirect { to, return_to } => match return_to {
            Some(origin) => format!("{} {} (return to {})", "redirect".yellow(), to, origin),
            None => format!("{} {}", "redirect".yellow(), to),
        },
    };
    Ok(output)
}

pub async fn access_can(
    context: &AppContext,
    cmd: &PermissionCheckRequest,
) -> anyhow::Result<String> {
    context.restore().await;
    context.ui().new_status_line(format!(
        "Checking {} on {} for {} ...",
        cmd.action.bright_blue(),
        cmd.module.bright_blue(),
        who(context)
    ));

    let allowed = context
        .state()
        .engine
        .has_permission(cmd.module, cmd.action);
    Ok(verdict(allowed))
}

pub async fn access_gate(context: &AppContext, cmd: &GateCheckRequest) -> anyhow::Result<String> {
    context.restore().await;
    let requirement = Requirement::from(cmd.clone());
    context.ui().new_status_line(format!(
        "Evaluating gate {:?} for {} ...",
        requirement,
        who(context)
    ));

    Ok(verdict(context.state().render_gate.evaluate(&requirement)))
}
