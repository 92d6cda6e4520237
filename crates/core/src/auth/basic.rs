//! HTTP Basic authentication against stored users.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

use super::{AuthError, AuthRequest, Authenticator, Identity};
use crate::service::AuthenticationService;

/// Verifies `Authorization: Basic <email:password>` through the
/// authentication service.
pub struct BasicAuthenticator {
    authentication: AuthenticationService,
}

impl BasicAuthenticator {
    pub fn new(authentication: AuthenticationService) -> Self {
        Self { authentication }
    }

    /// Extract `(email, password)` from the Authorization header.
    fn extract_credentials(request: &AuthRequest) -> Result<(String, String), AuthError> {
        let header = request
            .header("authorization")
            .ok_or(AuthError::NotAuthenticated)?;

        let (scheme, encoded) = header
            .split_once(' ')
            .ok_or_else(|| malformed("missing scheme"))?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::NotAuthenticated);
        }

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| malformed("invalid base64"))?;
        let decoded = String::from_utf8(decoded).map_err(|_| malformed("invalid utf-8"))?;
        let (email, password) = decoded
            .split_once(':')
            .ok_or_else(|| malformed("missing ':' separator"))?;

        Ok((email.to_string(), password.to_string()))
    }
}

fn malformed(detail: &str) -> AuthError {
    AuthError::InvalidCredentials(format!("malformed basic credentials: {}", detail))
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let (email, password) = Self::extract_credentials(request)?;

        let user = self
            .authentication
            .login(&email, &password)
            .await
            .map_err(|e| {
                if e.is_fatal() {
                    AuthError::ServiceUnavailable(e.to_string())
                } else {
                    AuthError::InvalidCredentials(e.to_string())
                }
            })?;

        Ok(Identity {
            user_id: user.id(),
            method: self.method_name().to_string(),
        })
    }

    fn method_name(&self) -> &'static str {
        "basic"
    }
}
