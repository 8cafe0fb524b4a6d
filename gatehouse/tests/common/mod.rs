#![allow(dead_code)]

use gatehouse::settings::Settings;
use gatehouse_core::authorization::Role;
use gatehouse_core::settings::directory::{DirectorySettings, DirectoryUser};
use gatehouse_core::settings::session::SessionSettings;
use gatehouse_core::utils::secret::MaskedSecret;
use std::collections::BTreeSet;
use std::path::Path;

pub const PASSWORD: &str = "correct horse battery staple";

fn user(id: &str, email: &str, roles: &[Role], region: Option<&str>) -> DirectoryUser {
    DirectoryUser {
        id: id.to_string(),
        name: id.to_string(),
        email: email.to_string(),
        password_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
        roles: roles.iter().copied().collect::<BTreeSet<_>>(),
        region: region.map(str::to_string),
    }
}

/// Settings with four directory users, the token file and policy file
/// living inside `dir`
pub fn settings_in(dir: &Path) -> Settings {
    Settings {
        policy_file: dir.join("policy.yaml"),
        session: SessionSettings::new(dir.join("session.json")),
        directory: DirectorySettings {
            token_secret: MaskedSecret::new("integration-secret".to_string()),
            users: vec![
                user("u-admin", "admin@example.com", &[Role::Admin], None),
                user(
                    "u-finance",
                    "finance@example.com",
                    &[Role::FinanceOfficer],
                    Some("north"),
                ),
                user("u-lessee", "lessee@example.com", &[Role::Lessee], None),
                user(
                    "u-multi",
                    "multi@example.com",
                    &[Role::Manager, Role::ZonalAdmin],
                    Some("south"),
                ),
            ],
        },
        ..Settings::default()
    }
}
