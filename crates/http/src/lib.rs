//! Typed HTTP client for the Tally backend
//!
//! Wraps `reqwest` with the session lifecycle the backend expects: bearer
//! tokens read from the shared [`tally_core::SessionStore`], silent
//! refresh near expiry, and a single refresh-and-retry on 401 responses.

pub mod cache;
pub mod claims;
pub mod client;
pub mod error;
pub mod refresh;
pub mod types;

pub use cache::{CompanyCache, EntityKind};
pub use client::{ClientBuilder, PublicClient, SessionClient};
pub use error::ClientError;
pub use refresh::TokenRefresher;
