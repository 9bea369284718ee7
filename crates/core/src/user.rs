// User domain types
//
// Users are owned by an external auth collaborator. The core only embeds
// copies of their public profile into events and RSVPs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user within the application.
/// - `host`: creates and manages events
/// - `attendee`: browses and RSVPs to events
/// - `admin`: platform administrator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Host,
    Attendee,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Host => write!(f, "host"),
            UserRole::Attendee => write!(f, "attendee"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "host" => UserRole::Host,
            "admin" => UserRole::Admin,
            _ => UserRole::Attendee,
        }
    }
}

/// Links to a user's social profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Public profile of a user, as embedded in events and RSVPs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
}

impl User {
    /// Name used for stub profiles until a real user directory is wired in.
    pub const STUB_NAME: &'static str = "Current User";
    /// Email used for stub profiles.
    pub const STUB_EMAIL: &'static str = "user@example.com";

    /// Minimal profile with only the required fields set.
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            avatar: None,
            bio: None,
            location: None,
            website: None,
            social_links: None,
        }
    }

    /// Stub profile for a user id that has not been looked up.
    pub fn stub(id: Uuid, role: UserRole) -> Self {
        Self::new(id, Self::STUB_NAME, Self::STUB_EMAIL, role)
    }

    pub fn is_host(&self) -> bool {
        self.role == UserRole::Host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [UserRole::Host, UserRole::Attendee, UserRole::Admin] {
            assert_eq!(UserRole::from(role.to_string().as_str()), role);
        }
        assert_eq!(UserRole::from("unknown"), UserRole::Attendee);
    }

    #[test]
    fn test_stub_profile() {
        let id = Uuid::now_v7();
        let user = User::stub(id, UserRole::Host);
        assert_eq!(user.id, id);
        assert_eq!(user.name, "Current User");
        assert_eq!(user.email, "user@example.com");
        assert!(user.is_host());
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let user = User::stub(Uuid::now_v7(), UserRole::Attendee);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "attendee");
        assert!(json.get("avatar").is_none());
        assert!(json.get("social_links").is_none());
    }
}
