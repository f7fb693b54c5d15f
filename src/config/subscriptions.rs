//! Subscription behaviour configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::owner::OwnerKind;

use super::error::ValidationError;

/// Which owners hold subscriptions and where their pages live
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionsConfig {
    /// Owner kind (`user`, `account`, `company`, `organization`, `team`)
    #[serde(default = "default_owner_kind")]
    pub owner_kind: String,

    /// Current-owner accessor name; defaults to `current_<owner_kind>`
    #[serde(default)]
    pub current_owner_accessor: Option<String>,

    /// Scope handed to the sign-up flow; defaults to the owner kind
    #[serde(default)]
    pub sign_up_scope: Option<String>,

    /// Registration path template with a `{scope}` placeholder
    #[serde(default = "default_registration_path_template")]
    pub registration_path_template: String,

    /// Prefix for every subscription route (empty serves at the root)
    #[serde(default)]
    pub mount_path: String,

    /// Redirect after create, with `{owner}` and `{subscription}` placeholders
    #[serde(default)]
    pub after_create_path: Option<String>,

    /// Notice shown after a successful create
    #[serde(default)]
    pub new_subscription_notice: Option<String>,

    /// YAML file with plans and owners for in-memory storage
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl SubscriptionsConfig {
    /// Parsed owner kind
    pub fn owner_kind(&self) -> Result<OwnerKind, ValidationError> {
        self.owner_kind
            .parse()
            .map_err(|_| ValidationError::UnknownOwnerKind(self.owner_kind.clone()))
    }

    /// Accessor name, falling back to the owner kind's conventional name
    pub fn accessor_name(&self) -> Result<String, ValidationError> {
        match self.current_owner_accessor.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Ok(self.owner_kind()?.default_accessor()),
        }
    }

    /// Sign-up scope, falling back to the owner kind name
    pub fn sign_up_scope(&self) -> Result<String, ValidationError> {
        match self.sign_up_scope.as_deref().map(str::trim) {
            Some(scope) if !scope.is_empty() => Ok(scope.to_string()),
            _ => Ok(self.owner_kind()?.as_str().to_string()),
        }
    }

    /// Validate subscription configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.owner_kind()?;

        if !self.mount_path.is_empty() && !self.mount_path.starts_with('/') {
            return Err(ValidationError::InvalidMountPath(self.mount_path.clone()));
        }

        if !self.registration_path_template.starts_with('/') {
            return Err(ValidationError::InvalidRegistrationTemplate(
                self.registration_path_template.clone(),
            ));
        }

        Ok(())
    }
}

impl Default for SubscriptionsConfig {
    fn default() -> Self {
        Self {
            owner_kind: default_owner_kind(),
            current_owner_accessor: None,
            sign_up_scope: None,
            registration_path_template: default_registration_path_template(),
            mount_path: String::new(),
            after_create_path: None,
            new_subscription_notice: None,
            seed_path: None,
        }
    }
}

fn default_owner_kind() -> String {
    "user".to_string()
}

fn default_registration_path_template() -> String {
    "/{scope}/sign_up".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_user_kind() {
        let config = SubscriptionsConfig::default();
        assert_eq!(config.owner_kind().unwrap(), OwnerKind::User);
        assert_eq!(config.accessor_name().unwrap(), "current_user");
        assert_eq!(config.sign_up_scope().unwrap(), "user");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_accessor_and_scope_win() {
        let config = SubscriptionsConfig {
            owner_kind: "account".to_string(),
            current_owner_accessor: Some("current_team_account".to_string()),
            sign_up_scope: Some("member".to_string()),
            ..Default::default()
        };
        assert_eq!(config.accessor_name().unwrap(), "current_team_account");
        assert_eq!(config.sign_up_scope().unwrap(), "member");
    }

    #[test]
    fn test_blank_accessor_falls_back() {
        let config = SubscriptionsConfig {
            owner_kind: "company".to_string(),
            current_owner_accessor: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.accessor_name().unwrap(), "current_company");
    }

    #[test]
    fn test_unknown_owner_kind_is_rejected() {
        let config = SubscriptionsConfig {
            owner_kind: "tenant".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::UnknownOwnerKind("tenant".to_string()))
        );
    }

    #[test]
    fn test_relative_mount_path_is_rejected() {
        let config = SubscriptionsConfig {
            mount_path: "billing".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidMountPath(_))
        ));
    }
}
