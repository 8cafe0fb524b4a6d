use clap::{Parser, Subcommand};
use clap_complete::Shell;
use gatehouse_core::access::requests::{GateCheckRequest, PermissionCheckRequest, RouteCheckRequest};
use gatehouse_core::authorization::Role;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gatehousectl")]
#[command(about = "Check who may reach which dashboard views and modules")]
#[command(version)]
pub struct Cli {
    /// Configuration file; without it config/default, config/{GATEHOUSE_RUN_MODE}
    /// and config/local are layered
    #[arg(long, env = "GATEHOUSE_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in against the identity directory and store the session token
    #[command(name = "auth:login")]
    AuthLogin(AuthLoginCommand),

    /// Log out and remove the stored session token
    #[command(name = "auth:logout")]
    AuthLogout,

    /// Show the current actor and its effective permissions
    #[command(name = "auth:status")]
    AuthStatus,

    /// Show whether a path renders or redirects for the current actor
    #[command(name = "access:route")]
    AccessRoute(RouteCheckRequest),

    /// Test a single module/action permission for the current actor
    #[command(name = "access:can")]
    AccessCan(PermissionCheckRequest),

    /// Evaluate an in-page gate for the current actor
    #[command(name = "access:gate")]
    AccessGate(GateCheckRequest),

    /// Show the expanded permission table
    #[command(name = "policy:show")]
    PolicyShow(PolicyShowCommand),

    /// Create a bcrypt hash for a directory user
    #[command(name = "directory:hash-password")]
    DirectoryHashPassword(HashPasswordCommand),

    /// Show shell completion script.
    #[command(name = "completion")]
    Completion(CompletionCommand),
}

#[derive(Debug, Parser)]
pub struct AuthLoginCommand {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "GATEHOUSE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Parser)]
pub struct PolicyShowCommand {
    /// Only show this role
    #[arg(long)]
    pub role: Option<Role>,
}

#[derive(Debug, Parser)]
pub struct HashPasswordCommand {
    #[arg(long, env = "GATEHOUSE_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
    pub cost: u32,
}

#[derive(Debug, Parser)]
pub struct CompletionCommand {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn print_completions<G: clap_complete::Generator>(gen: G, cmd: &mut clap::Command) {
    clap_complete::generate(gen, cmd, cmd.get_name().to_string(), &mut std::io::stdout());
}
