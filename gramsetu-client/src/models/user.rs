/// User model
///
/// Registered panchayat members and administrators as returned by the auth
/// and user endpoints. Most fields are optional because different endpoints
/// return different projections of the same record.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an authenticated user
///
/// Determines which login portal and refresh endpoint apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    /// Platform administrator
    Admin,

    /// Panchayat official
    Official,

    /// Registered citizen
    Citizen,
}

impl UserType {
    /// Path segment used by the role-scoped auth endpoints
    pub fn route_segment(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Official => "official",
            UserType::Citizen => "citizen",
        }
    }

    /// Wire representation (e.g. "ADMIN")
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "ADMIN",
            UserType::Official => "OFFICIAL",
            UserType::Citizen => "CITIZEN",
        }
    }

    /// Parses the wire representation, tolerating lowercase input
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(UserType::Admin),
            "OFFICIAL" => Some(UserType::Official),
            "CITIZEN" => Some(UserType::Citizen),
            _ => None,
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered member or administrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-side record ID
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Login username (admins and officials only)
    #[serde(default)]
    pub username: Option<String>,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,

    /// Voter ID (citizens only)
    #[serde(default)]
    pub voter_id: Option<String>,

    /// Panchayat the user belongs to
    #[serde(default)]
    pub panchayat_id: Option<String>,

    /// Ward within the panchayat
    #[serde(default)]
    pub ward_id: Option<String>,

    /// Role, stamped client-side after login when the server omits it
    #[serde(default)]
    pub user_type: Option<UserType>,
}
