/// Token persistence and inspection
///
/// This module owns the persisted access/refresh token pair and the
/// unverified JWT payload decode used for display and endpoint-routing
/// hints.
///
/// # Module Organization
///
/// - `store`: the [`TokenStore`] trait with in-memory and file-backed
///   implementations
/// - `claims`: untrusted decode of a JWT payload, never used for
///   authorization decisions
pub mod claims;
pub mod store;

pub use claims::TokenClaims;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
