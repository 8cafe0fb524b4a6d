use clap::{CommandFactory, Parser};
use gatehouse::init_telemetry::init_tracing;
use gatehousectl::cli::{print_completions, Cli, Commands};
use gatehousectl::commands;
use gatehousectl::context::{load_settings, AppContext};
use gatehousectl::ui::Ui;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Commands that need no configuration
    match &cli.command {
        Commands::Completion(cmd) => {
            let mut cli_cmd = Cli::command();
            print_completions(cmd.shell, &mut cli_cmd);
            return Ok(());
        }
        Commands::DirectoryHashPassword(cmd) => {
            println!("{}", commands::directory::hash_password(cmd)?);
            return Ok(());
        }
        _ => {}
    }

    let settings = load_settings(cli.config.as_deref())?;
    let level = if cli.debug {
        "debug".to_string()
    } else {
        settings.log_level.clone()
    };
    init_tracing(&level)?;

    info!("Running command {:?} ...", &cli.command);

    let app_context = AppContext::new(settings, Ui::new()).await?;

    let result = match &cli.command {
        Commands::AuthLogin(cmd) => commands::auth::auth_login(&app_context, cmd).await,
        Commands::AuthLogout => commands::auth::auth_logout(&app_context).await,
        Commands::AuthStatus => commands::auth::auth_status(&app_context).await,
        Commands::AccessRoute(cmd) => commands::access::access_route(&app_context, cmd).await,
        Commands::AccessCan(cmd) => commands::access::access_can(&app_context, cmd).await,
        Commands::AccessGate(cmd) => commands::access::access_gate(&app_context, cmd).await,
        Commands::PolicyShow(cmd) => commands::policy::policy_show(&app_context, cmd).await,
        Commands::Completion(_) | Commands::DirectoryHashPassword(_) => Ok(String::new()),
    }?;

    app_context.ui().println(result);
    Ok(())
}
