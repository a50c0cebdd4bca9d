//! Authentication and password recovery endpoints

use super::{PublicClient, SessionClient};
use crate::claims;
use crate::error::ClientError;
use crate::types::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, ResetPasswordRequest, TokenPairResponse,
};
use tally_core::Session;

impl PublicClient {
    /// `POST /v1/auth/login`. Returns the session decoded from the access
    /// token's claims; a rejected login maps to `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/auth/login")
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });

        let pair: TokenPairResponse = match self.execute(request).await {
            Ok(pair) => pair,
            Err(ClientError::AuthenticationFailed(message))
            | Err(ClientError::Forbidden(message)) => {
                return Err(ClientError::InvalidCredentials(message));
            }
            Err(other) => return Err(other),
        };

        let refresh_token = pair.refresh_token.as_deref().ok_or_else(|| {
            ClientError::Token("login response is missing the refresh token".to_string())
        })?;
        claims::session_from_tokens(&pair.access_token, refresh_token)
    }

    /// `POST /v1/password/forgot`
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/password/forgot")
            .json(&ForgotPasswordRequest {
                email: email.to_string(),
            });
        self.execute(request).await
    }

    /// `POST /v1/password/reset`
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/password/reset")
            .json(&ResetPasswordRequest {
                token: token.to_string(),
                new_password: new_password.to_string(),
            });
        self.execute(request).await
    }
}

impl SessionClient {
    /// Log in and install the resulting session in the shared store.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let session = self.to_public().login(email, password).await?;
        tracing::info!(email = %session.email, role = %session.role, "signed in");
        self.store().set(session.clone());
        Ok(session)
    }

    /// Destroy the session. The backend keeps no session state to revoke.
    pub fn sign_out(&self) {
        tracing::info!("signed out");
        self.store().clear();
    }
}
