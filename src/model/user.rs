use serde::Serialize;

use super::role::Role;

/// Login view of a user: credentials joined with the (optional) employee profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub employee_id: Option<u64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Account {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub matricule: String,
    pub first_name: String,
    pub last_name: String,
}

/// Read-only identity used to compose notification text.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserProfile {
    pub user_id: u64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserProfile {
    /// "First Last" from the employee profile, or the local part of the email.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.split('@').next().unwrap_or_default().to_string()
        } else {
            full
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: Option<&str>, last: Option<&str>) -> UserProfile {
        UserProfile {
            user_id: 1,
            email: "marie.curie@example.org".into(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
        }
    }

    #[test]
    fn display_name_prefers_profile_names() {
        assert_eq!(profile(Some("Marie"), Some("Curie")).display_name(), "Marie Curie");
        assert_eq!(profile(Some("Marie"), None).display_name(), "Marie");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(profile(None, Some(" ")).display_name(), "marie.curie");
    }
}
