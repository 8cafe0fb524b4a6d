use anyhow::Context;

use crate::cli::HashPasswordCommand;

/// Hash for the `password_hash` field of a directory user
pub fn hash_password(cmd: &HashPasswordCommand) -> anyhow::Result<String> {
    bcrypt::hash(&cmd.password, cmd.cost).context("Failed to hash password")
}
