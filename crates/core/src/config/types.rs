use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::store::MAX_PAGE_SIZE;
use crate::user::Role;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    /// Accounts created at startup when missing.
    #[serde(default)]
    pub users: Vec<BuiltinUser>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Trust the `X-User-Id` header set by a fronting gateway.
    Header,
    /// HTTP Basic with email and password.
    Basic,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Header => "header",
            AuthMethod::Basic => "basic",
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("helpdesk.db")
}

/// Listing defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PagingConfig {
    /// Page size used when a request does not specify one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

impl PagingConfig {
    pub fn max_page_size(&self) -> u32 {
        MAX_PAGE_SIZE
    }
}

/// A built-in account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuiltinUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub paging: PagingConfig,
    pub users: Vec<SanitizedBuiltinUser>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
}

/// Built-in account without its password.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedBuiltinUser {
    pub email: String,
    pub role: Role,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: config.auth.method.as_str().to_string(),
            },
            server: config.server.clone(),
            database: config.database.clone(),
            paging: config.paging.clone(),
            users: config
                .users
                .iter()
                .map(|u| SanitizedBuiltinUser {
                    email: u.email.clone(),
                    role: u.role,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_header_auth() {
        let toml = r#"
[auth]
method = "header"

[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.auth.method, AuthMethod::Header);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_defaults() {
        let toml = r#"
[auth]
method = "basic"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.auth.method, AuthMethod::Basic);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path, PathBuf::from("helpdesk.db"));
        assert_eq!(config.paging.default_page_size, 10);
        assert!(config.users.is_empty());
    }

    #[test]
    fn test_deserialize_missing_auth_fails() {
        let toml = r#"
[server]
port = 8080
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_deserialize_builtin_users() {
        let toml = r#"
[auth]
method = "basic"

[[users]]
name = "Root"
surname = "Admin"
email = "root@helpdesk.example"
password = "Sup3r$ecret"
role = "administrator"

[[users]]
name = "First"
surname = "Analyst"
email = "analyst@helpdesk.example"
password = "Anal7st!"
role = "analyst"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].role, Role::Administrator);
        assert_eq!(config.users[1].role, Role::Analyst);
    }

    #[test]
    fn test_sanitized_config_drops_passwords() {
        let toml = r#"
[auth]
method = "basic"

[[users]]
name = "Root"
surname = "Admin"
email = "root@helpdesk.example"
password = "Sup3r$ecret"
role = "administrator"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        let json = serde_json::to_string(&sanitized).unwrap();

        assert!(json.contains("root@helpdesk.example"));
        assert!(!json.contains("Sup3r$ecret"));
        assert_eq!(sanitized.auth.method, "basic");
    }
}
