//! Sign-up flow port.
//!
//! Anonymous visitors picking a plan are sent to registration. The host's
//! authentication stack owns the registration pages; this port only builds
//! the paths to them.

use crate::domain::plan::Plan;

pub trait SignUpFlow: Send + Sync {
    /// Registration path for a scope, carrying the chosen plan when known.
    fn registration_path(&self, scope: &str, plan: Option<&Plan>) -> String;

    /// Registration path without scope or plan.
    fn default_registration_path(&self) -> String;
}
