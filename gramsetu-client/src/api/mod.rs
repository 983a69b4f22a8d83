/// Domain API surface
///
/// Thin typed wrappers over the REST endpoints, grouped by resource. Every
/// call goes through the shared [`Session`](crate::session::Session), which
/// handles bearer attachment and token refresh; the modules here only know
/// paths, request shapes, and response parsing.
///
/// # Module Organization
///
/// - `auth`: login flows, token refresh, password reset
/// - `issues`: issue listing, lookups, transcription, attachments
/// - `summaries`: per-panchayat issue summaries and agenda editing
/// - `gram_sabha`: meeting CRUD, attendance, RSVPs
pub mod auth;
pub mod gram_sabha;
pub mod issues;
pub mod summaries;

pub use auth::{AuthApi, CitizenLoginRequest, FaceLoginOutcome, LoginCredentials, LoginOutcome};
pub use gram_sabha::GramSabhaApi;
pub use issues::{IssuePage, IssueQuery, IssuesApi, TranscriptionReport};
pub use summaries::SummariesApi;
