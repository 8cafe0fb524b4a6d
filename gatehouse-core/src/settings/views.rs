use serde::{Deserialize, Serialize};

/// Paths of the views a guard can redirect to
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    #[serde(default = "default_login_view")]
    pub login: String,
    #[serde(default = "default_customer_portal_view")]
    pub customer_portal: String,
    /// Default landing view for authenticated staff
    #[serde(default = "default_home_view")]
    pub home: String,
}

fn default_login_view() -> String {
    "/login".to_string()
}

fn default_customer_portal_view() -> String {
    "/customer-portal".to_string()
}

fn default_home_view() -> String {
    "/dashboard".to_string()
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            login: default_login_view(),
            customer_portal: default_customer_portal_view(),
            home: default_home_view(),
        }
    }
}
