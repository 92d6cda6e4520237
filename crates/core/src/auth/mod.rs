mod basic;
mod header;
mod traits;
mod types;

pub use basic::*;
pub use header::*;
pub use traits::*;
pub use types::*;

use crate::config::AuthConfig;
use crate::service::AuthenticationService;

/// Factory function to create authenticator from config
pub fn create_authenticator(
    config: &AuthConfig,
    authentication: AuthenticationService,
) -> Box<dyn Authenticator> {
    use crate::config::AuthMethod;

    match config.method {
        AuthMethod::Header => Box::new(HeaderAuthenticator::new()),
        AuthMethod::Basic => Box::new(BasicAuthenticator::new(authentication)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthMethod;
    use crate::testing::InMemoryStore;
    use crate::testing::fixtures::hasher;
    use std::sync::Arc;

    fn authentication() -> AuthenticationService {
        AuthenticationService::new(Arc::new(InMemoryStore::new()), Arc::new(hasher()))
    }

    #[test]
    fn test_create_authenticator_header() {
        let config = AuthConfig {
            method: AuthMethod::Header,
        };
        let auth = create_authenticator(&config, authentication());
        assert_eq!(auth.method_name(), "header");
    }

    #[test]
    fn test_create_authenticator_basic() {
        let config = AuthConfig {
            method: AuthMethod::Basic,
        };
        let auth = create_authenticator(&config, authentication());
        assert_eq!(auth.method_name(), "basic");
    }
}
