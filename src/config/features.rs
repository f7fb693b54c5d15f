//! Feature flags configuration

use serde::Deserialize;

use crate::domain::subscription::ParamPolicy;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Offer the sign-up redirect to anonymous visitors of `new`.
    /// When off, such requests fail as misconfigured.
    #[serde(default = "default_true")]
    pub sign_up_flow: bool,

    /// Drop unpermitted attributes instead of handing them to the model
    #[serde(default = "default_true")]
    pub strict_params: bool,

    /// Owners may be addressed by slug as well as by id
    #[serde(default)]
    pub slug_lookup: bool,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,
}

impl FeatureFlags {
    pub fn param_policy(&self) -> ParamPolicy {
        if self.strict_params {
            ParamPolicy::Strict
        } else {
            ParamPolicy::PassThrough
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            sign_up_flow: true,
            strict_params: true,
            slug_lookup: false,
            json_logs: false,
        }
    }
}

fn default_true() -> bool {
    true
}
