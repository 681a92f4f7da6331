//! Filtering for the user list view

use crate::domain::identity::Role;

use super::entity::User;

/// Active-state filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("Unknown status filter: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub user_type: Option<Role>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.matches_search(user) && self.matches_status(user) && self.matches_type(user)
    }

    /// Keep the users that pass every filter, preserving order
    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|u| self.matches(u)).collect()
    }

    fn matches_search(&self, user: &User) -> bool {
        let Some(term) = self.search.as_deref().map(str::to_lowercase) else {
            return true;
        };

        [
            &user.username,
            &user.email,
            &user.first_name,
            &user.last_name,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_status(&self, user: &User) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => user.is_active,
            StatusFilter::Inactive => !user.is_active,
        }
    }

    fn matches_type(&self, user: &User) -> bool {
        self.user_type.is_none_or(|t| user.user_type == t)
    }
}
