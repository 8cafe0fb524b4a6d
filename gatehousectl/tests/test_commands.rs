use gatehouse::settings::Settings;
use gatehouse_core::access::requests::{GateCheckRequest, PermissionCheckRequest, RouteCheckRequest};
use gatehouse_core::authorization::{ModuleAccess, PermissionAction, Role};
use gatehouse_core::settings::directory::{DirectorySettings, DirectoryUser};
use gatehouse_core::settings::session::SessionSettings;
use gatehouse_core::utils::secret::MaskedSecret;
use gatehousectl::cli::{AuthLoginCommand, HashPasswordCommand, PolicyShowCommand};
use gatehousectl::commands::{access, auth, directory, policy};
use gatehousectl::context::AppContext;
use gatehousectl::ui::Ui;
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::tempdir;

fn settings_in(dir: &Path) -> Settings {
    let password_hash = directory::hash_password(&HashPasswordCommand {
        password: "s3cret".to_string(),
        cost: 4,
    })
    .unwrap();

    Settings {
        policy_file: dir.join("policy.yaml"),
        session: SessionSettings::new(dir.join("session.json")),
        directory: DirectorySettings {
            token_secret: MaskedSecret::new("ctl-secret".to_string()),
            users: vec![DirectoryUser {
                id: "u-lessee".to_string(),
                name: "Lena".to_string(),
                email: "lena@example.com".to_string(),
                password_hash,
                roles: BTreeSet::from([Role::Lessee]),
                region: None,
            }],
        },
        ..Settings::default()
    }
}

/// Each CLI invocation is a fresh process; model that with a fresh context
async fn invocation(dir: &Path) -> AppContext {
    AppContext::new(settings_in(dir), Ui::quiet()).await.unwrap()
}

#[tokio::test]
async fn test_login_then_check_in_later_invocations() {
    let dir = tempdir().unwrap();

    auth::auth_login(
        &invocation(dir.path()).await,
        &AuthLoginCommand {
            email: "lena@example.com".to_string(),
            password: Some("s3cret".to_string()),
        },
    )
    .await
    .unwrap();

    let status = auth::auth_status(&invocation(dir.path()).await).await.unwrap();
    assert!(status.contains("u-lessee"));
    assert!(status.contains("loans"));

    let route = access::access_route(
        &invocation(dir.path()).await,
        &RouteCheckRequest {
            path: "/settings".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(route.contains("/customer-portal"));

    let can = access::access_can(
        &invocation(dir.path()).await,
        &PermissionCheckRequest {
            module: ModuleAccess::Loans,
            action: PermissionAction::Read,
        },
    )
    .await
    .unwrap();
    assert!(can.contains("allow"));

    let gate = access::access_gate(
        &invocation(dir.path()).await,
        &GateCheckRequest {
            roles: vec![Role::Admin],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(gate.contains("deny"));

    auth::auth_logout(&invocation(dir.path()).await).await.unwrap();
    let status = auth::auth_status(&invocation(dir.path()).await).await.unwrap();
    assert!(status.contains("auth:login"));
}

#[tokio::test]
async fn test_login_without_password_fails() {
    let dir = tempdir().unwrap();
    let result = auth::auth_login(
        &invocation(dir.path()).await,
        &AuthLoginCommand {
            email: "lena@example.com".to_string(),
            password: None,
        },
    )
    .await;

    assert!(result.unwrap_err().to_string().contains("GATEHOUSE_PASSWORD"));
}

#[tokio::test]
async fn test_anonymous_route_check_redirects_to_login() {
    let dir = tempdir().unwrap();
    let route = access::access_route(
        &invocation(dir.path()).await,
        &RouteCheckRequest {
            path: "/finance".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(route.contains("/login"));
    assert!(route.contains("return to /finance"));
}

#[tokio::test]
async fn test_policy_show_single_role() {
    let dir = tempdir().unwrap();
    let output = policy::policy_show(
        &invocation(dir.path()).await,
        &PolicyShowCommand {
            role: Some(Role::FinanceOfficer),
        },
    )
    .await
    .unwrap();

    assert!(output.contains("Mode: Strict"));
    assert!(output.contains("Finance officer"));
    assert!(output.contains("approve"));
    assert!(!output.contains("Lessee"));
}

#[test]
fn test_hash_password_verifies() {
    let hash = directory::hash_password(&HashPasswordCommand {
        password: "hunter22".to_string(),
        cost: 4,
    })
    .unwrap();

    assert!(bcrypt::verify("hunter22", &hash).unwrap());
}
