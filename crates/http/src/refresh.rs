//! Silent token refresh

use crate::claims;
use crate::client::PublicClient;
use crate::error::ClientError;
use crate::types::TokenPairResponse;
use chrono::Utc;
use std::sync::Arc;
use tally_core::{Session, SessionStore};
use tokio::sync::Mutex;

/// Exchanges a near-expiry refresh token for a fresh pair and writes the
/// result back to the shared store.
///
/// Refreshing is single-flight: concurrent stale detections share one
/// refresh call instead of racing. A failed exchange is terminal — the
/// session loses its access token and is marked `RefreshFailed`; there is
/// no automatic retry.
pub struct TokenRefresher {
    public: PublicClient,
    store: Arc<SessionStore>,
    skew_secs: i64,
    guard: Mutex<()>,
}

impl TokenRefresher {
    pub fn new(public: PublicClient, store: Arc<SessionStore>, skew_secs: i64) -> Self {
        Self {
            public,
            store,
            skew_secs,
            guard: Mutex::new(()),
        }
    }

    /// Refresh only when the current token is within the skew window of
    /// its expiry. Fresh sessions (and absent ones) make no network call.
    pub async fn ensure_fresh(&self) -> Result<(), ClientError> {
        match self.store.get() {
            Some(session)
                if session.is_usable()
                    && session.is_stale(Utc::now().timestamp(), self.skew_secs) =>
            {
                self.refresh().await
            }
            _ => Ok(()),
        }
    }

    /// Perform one refresh. Concurrent callers coalesce: whoever holds the
    /// guard does the exchange, the rest observe the replaced token and
    /// return without a second call.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let observed = match self.store.get() {
            Some(session) if session.is_usable() => session.access_token.clone(),
            _ => {
                return Err(ClientError::AuthenticationFailed(
                    "no usable session to refresh".to_string(),
                ));
            }
        };

        let _permit = self.guard.lock().await;

        let current = match self.store.get() {
            Some(session) if session.is_usable() => session,
            _ => {
                return Err(ClientError::AuthenticationFailed(
                    "session was invalidated while waiting to refresh".to_string(),
                ));
            }
        };
        if current.access_token != observed {
            // another caller refreshed while we waited on the guard
            return Ok(());
        }

        match self.exchange(&current).await {
            Ok(next) => {
                tracing::debug!(email = %next.email, expires_at = next.expires_at, "token refreshed");
                self.store.set(next);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, signing session out");
                self.store.set((*current).clone().into_refresh_failed());
                Err(err)
            }
        }
    }

    /// `PUT /v1/auth/refresh/{email}` with the refresh token as bearer.
    async fn exchange(&self, session: &Session) -> Result<Session, ClientError> {
        let path = format!("/v1/auth/refresh/{}", session.email);
        let request = self
            .public
            .request(reqwest::Method::PUT, &path)
            .bearer_auth(&session.refresh_token);
        let pair: TokenPairResponse = self.public.execute(request).await?;

        let refresh_token = pair
            .refresh_token
            .as_deref()
            .unwrap_or(&session.refresh_token);
        claims::session_from_tokens(&pair.access_token, refresh_token)
    }
}
