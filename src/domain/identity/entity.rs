//! Authenticated identity and roles

use serde::{Deserialize, Serialize};

/// Role of a user; also the `userType` discriminant of user records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Customer,
    Administrator,
    Veterinarian,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Administrator, Role::Veterinarian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Administrator => "ADMINISTRATOR",
            Self::Veterinarian => "VETERINARIAN",
        }
    }

    pub fn is_administrator(&self) -> bool {
        matches!(self, Self::Administrator)
    }

    /// User types this role may assign when creating or editing users
    pub fn assignable_user_types(&self) -> &'static [Role] {
        if self.is_administrator() {
            &Self::ALL
        } else {
            &[Role::Customer]
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CUSTOMER" => Ok(Self::Customer),
            "ADMINISTRATOR" => Ok(Self::Administrator),
            "VETERINARIAN" => Ok(Self::Veterinarian),
            other => Err(format!("Unknown user type: {}", other)),
        }
    }
}

/// Reference to the account an identity primarily belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
}

/// The authenticated actor's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, rename = "userType", alias = "role")]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, rename = "primaryAccount", skip_serializing_if = "Option::is_none")]
    pub primary_account: Option<AccountRef>,
}

fn default_active() -> bool {
    true
}

impl Identity {
    pub fn is_administrator(&self) -> bool {
        self.role.is_administrator()
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_login_response() {
        let identity: Identity =
            serde_json::from_str(r#"{"id":1,"username":"bob","userType":"CUSTOMER"}"#).unwrap();

        assert_eq!(identity.id, 1);
        assert_eq!(identity.username, "bob");
        assert_eq!(identity.role, Role::Customer);
        assert!(identity.is_active);
        assert!(identity.primary_account.is_none());
    }

    #[test]
    fn test_identity_accepts_role_alias() {
        let identity: Identity =
            serde_json::from_str(r#"{"id":2,"username":"vet","role":"VETERINARIAN"}"#).unwrap();
        assert_eq!(identity.role, Role::Veterinarian);
    }

    #[test]
    fn test_identity_survives_storage_round_trip() {
        let identity: Identity = serde_json::from_str(
            r#"{"id":3,"username":"ann","firstName":"Ann","lastName":"Lee","userType":"ADMINISTRATOR","primaryAccount":{"id":9,"farmName":"Green Acres"}}"#,
        )
        .unwrap();

        let stored = serde_json::to_string(&identity).unwrap();
        assert!(stored.contains("\"userType\":\"ADMINISTRATOR\""));

        let restored: Identity = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, identity);
        assert_eq!(restored.display_name(), "Ann Lee");
    }

    #[test]
    fn test_assignable_user_types() {
        assert_eq!(Role::Customer.assignable_user_types(), &[Role::Customer]);
        assert_eq!(Role::Veterinarian.assignable_user_types(), &[Role::Customer]);
        assert_eq!(Role::Administrator.assignable_user_types().len(), 3);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("veterinarian".parse::<Role>(), Ok(Role::Veterinarian));
        assert!("farmer".parse::<Role>().is_err());
    }
}
