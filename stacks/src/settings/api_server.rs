use serde::Deserialize;

/// HTTP API settings.
#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct ApiServer {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// When false, catalog list/detail endpoints require a logged-in
    /// identity.
    #[serde(default = "default_public_catalog_reads")]
    pub public_catalog_reads: bool,
    /// Username of the bootstrapped admin account.
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    /// When set, an admin account is created at startup with this
    /// password (unless the username is already taken).
    #[serde(default)]
    pub admin_password: Option<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_public_catalog_reads() -> bool {
    true
}

fn default_admin_username() -> String {
    "admin".to_string()
}

impl Default for ApiServer {
    fn default() -> Self {
        ApiServer {
            bind_address: default_bind_address(),
            public_catalog_reads: default_public_catalog_reads(),
            admin_username: default_admin_username(),
            admin_password: None,
        }
    }
}
