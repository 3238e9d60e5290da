use serde::{Deserialize, Serialize};

use super::profile::StartupId;

/// Caller identity injected per call by the session provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    user_id: Option<StartupId>,
}

impl Identity {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(StartupId(user_id.into())),
        }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Startup documents are keyed by the owning user's id.
    pub fn user_id(&self) -> Option<&StartupId> {
        self.user_id.as_ref()
    }
}

/// Role stored on a platform account that unlocks the admin review queue.
pub const SUPER_ADMIN_ROLE: &str = "SUPER_ADMIN";

/// Platform account record kept under `users/{uid}`, separate from the startup profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAccount {
    pub id: StartupId,
    pub email: String,
    pub role: String,
}

impl UserAccount {
    pub fn is_super_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(SUPER_ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_super_admin_role_is_privileged() {
        let account = |role: &str| UserAccount {
            id: StartupId::from("u-1"),
            role: role.to_string(),
            ..UserAccount::default()
        };

        assert!(account("SUPER_ADMIN").is_super_admin());
        assert!(account("super_admin").is_super_admin());
        assert!(!account("ADMIN").is_super_admin());
        assert!(!account("FOUNDER").is_super_admin());
        assert!(!account("").is_super_admin());
    }
}
