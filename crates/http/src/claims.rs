//! Access token claims decoding

use crate::error::ClientError;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tally_core::{Role, Session};

/// Claims carried in the backend's access tokens.
///
/// The signing secret lives on the backend; the client only consumes the
/// claims, so tokens are decoded without signature verification. Expiry
/// policy is enforced by the token refresher, not at decode time.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessClaims {
    /// Subject (user email)
    pub sub: String,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
    #[serde(default)]
    pub roles: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(default, rename = "companyId")]
    pub company_id: Option<i64>,
}

impl AccessClaims {
    /// Decode claims from a raw token.
    pub fn decode(token: &str) -> Result<Self, ClientError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<Self>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| ClientError::Token(format!("failed to decode access token: {e}")))
    }

    /// Resolve the role claim, preferring `roles` over the legacy `role`
    /// field. Unknown values are rejected.
    pub fn role(&self) -> Result<Role, ClientError> {
        let value = self
            .roles
            .as_deref()
            .or(self.role.as_deref())
            .ok_or_else(|| ClientError::Token("access token carries no role claim".to_string()))?;

        value
            .parse()
            .map_err(|_| ClientError::Token(format!("unknown role claim: {value}")))
    }
}

/// Build a session from a freshly issued token pair.
pub fn session_from_tokens(
    access_token: &str,
    refresh_token: &str,
) -> Result<Session, ClientError> {
    let claims = AccessClaims::decode(access_token)?;
    let role = claims.role()?;

    Ok(Session {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        email: claims.sub,
        role,
        expires_at: claims.exp,
        first_name: claims.first_name,
        last_name: claims.last_name,
        company_id: claims.company_id,
        last_error: None,
    })
}
