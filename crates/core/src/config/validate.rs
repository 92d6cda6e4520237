use std::collections::HashSet;

use super::{types::Config, ConfigError};
use crate::store::MAX_PAGE_SIZE;
use crate::user::{Email, Password};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Default page size is within 1..=MAX_PAGE_SIZE
/// - Built-in users have a valid, unique email and a policy-compliant password
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let page_size = config.paging.default_page_size;
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::ValidationError(format!(
            "paging.default_page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let mut seen = HashSet::new();
    for (i, user) in config.users.iter().enumerate() {
        let email = Email::parse(&user.email).map_err(|e| {
            ConfigError::ValidationError(format!("users[{}].email: {}", i, e))
        })?;
        Password::parse(&user.password).map_err(|e| {
            ConfigError::ValidationError(format!("users[{}].password: {}", i, e))
        })?;
        if !seen.insert(email.clone()) {
            return Err(ConfigError::ValidationError(format!(
                "users[{}].email: {} is declared twice",
                i, email
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AuthConfig, AuthMethod, BuiltinUser, DatabaseConfig, PagingConfig, ServerConfig,
    };
    use crate::user::Role;

    fn config() -> Config {
        Config {
            auth: AuthConfig {
                method: AuthMethod::Header,
            },
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            paging: PagingConfig::default(),
            users: vec![],
        }
    }

    fn builtin(email: &str, password: &str) -> BuiltinUser {
        BuiltinUser {
            name: "Built".to_string(),
            surname: "In".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Administrator,
        }
    }

    #[test]
    fn test_validate_valid_config() {
        let mut config = config();
        config.users.push(builtin("root@helpdesk.example", "Sup3r$ecret"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = config();
        config.server.port = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_page_size_bounds() {
        let mut config = config();
        config.paging.default_page_size = 0;
        assert!(validate_config(&config).is_err());

        config.paging.default_page_size = 101;
        assert!(validate_config(&config).is_err());

        config.paging.default_page_size = 100;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_builtin_users() {
        let mut config = config();
        config.users.push(builtin("not-an-email", "Sup3r$ecret"));
        assert!(validate_config(&config).is_err());

        let mut config = self::config();
        config.users.push(builtin("root@helpdesk.example", "weak"));
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("users[0].password"));

        let mut config = self::config();
        config.users.push(builtin("root@helpdesk.example", "Sup3r$ecret"));
        config.users.push(builtin("ROOT@helpdesk.example", "Sup3r$ecret"));
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }
}
