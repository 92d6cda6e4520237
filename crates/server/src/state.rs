use std::sync::Arc;
use helpdesk_core::{Authenticator, Config, SanitizedConfig, Services};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    services: Services,
}

impl AppState {
    pub fn new(config: Config, authenticator: Arc<dyn Authenticator>, services: Services) -> Self {
        Self {
            config,
            authenticator,
            services,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Page size used when a listing request does not name one.
    pub fn default_page_size(&self) -> i64 {
        i64::from(self.config.paging.default_page_size)
    }
}
