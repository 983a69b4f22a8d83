//! # GramSetu Client
//!
//! Typed client for the GramSetu panchayat governance REST API: issue
//! tracking, Gram Sabha meetings and agenda summaries, and the role-split
//! authentication flows used by admins, officials, and citizens.
//!
//! The core of the crate is the session layer, which keeps an authenticated
//! session alive transparently: expired access tokens are refreshed behind
//! a single in-flight exchange shared by all concurrent requests, and the
//! original requests are retried exactly once with the fresh token.
//!
//! ## Module Organization
//!
//! - `client`: the [`Client`] facade bundling everything below
//! - `config`: environment-driven configuration
//! - `session`: authenticated request execution and token refresh
//! - `api`: typed endpoint wrappers (auth, issues, summaries, gram_sabha)
//! - `models`: REST resource DTOs
//! - `token`: token persistence and unverified claims decode
//! - `transport`: HTTP seam with reqwest and mock implementations
//! - `listing`: client-side filter/sort/paginate over fetched issues
//! - `format`: display helpers
//! - `error`: unified error type

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod listing;
pub mod models;
pub mod session;
pub mod token;
pub mod transport;

pub use client::Client;
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use session::{LoginPortal, Session};

/// Current version of the GramSetu client library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
