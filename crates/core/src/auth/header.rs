//! Gateway header authentication.

use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};
use crate::user::UserId;

/// Header carrying the numeric id of the acting user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Trusts the `X-User-Id` header set by a fronting gateway.
///
/// Only suitable behind a proxy that strips the header from client requests.
#[derive(Debug, Default)]
pub struct HeaderAuthenticator;

impl HeaderAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for HeaderAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let raw = request
            .header(USER_ID_HEADER)
            .ok_or(AuthError::NotAuthenticated)?;

        let id: i64 = raw.trim().parse().map_err(|_| {
            AuthError::InvalidCredentials(format!("{} must be a numeric user id", USER_ID_HEADER))
        })?;
        if id <= 0 {
            return Err(AuthError::InvalidCredentials(format!(
                "{} must be positive",
                USER_ID_HEADER
            )));
        }

        Ok(Identity {
            user_id: UserId(id),
            method: self.method_name().to_string(),
        })
    }

    fn method_name(&self) -> &'static str {
        "header"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::{IpAddr, Ipv4Addr};

    fn request(headers: &[(&str, &str)]) -> AuthRequest {
        AuthRequest {
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            source_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }

    #[tokio::test]
    async fn test_header_identity() {
        let auth = HeaderAuthenticator::new();
        let identity = auth.authenticate(&request(&[("x-user-id", " 7 ")])).await.unwrap();
        assert_eq!(identity.user_id, UserId(7));
        assert_eq!(identity.method, "header");
    }

    #[tokio::test]
    async fn test_missing_header() {
        let auth = HeaderAuthenticator::new();
        let result = auth.authenticate(&request(&[])).await;
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_invalid_header() {
        let auth = HeaderAuthenticator::new();
        for value in ["abc", "-3", "0", ""] {
            let result = auth.authenticate(&request(&[("x-user-id", value)])).await;
            assert!(
                matches!(result, Err(AuthError::InvalidCredentials(_))),
                "{:?} should be rejected",
                value
            );
        }
    }
}
