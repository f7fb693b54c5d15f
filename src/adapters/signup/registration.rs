//! Registration paths of the host's authentication pages.

use url::form_urlencoded;

use crate::domain::plan::Plan;
use crate::ports::SignUpFlow;

const SCOPE_PLACEHOLDER: &str = "{scope}";

/// Builds registration paths from a template such as `/{scope}/sign_up`.
/// Registration pages belong to the host and live outside the
/// subscription mount.
#[derive(Debug, Clone)]
pub struct RegistrationPathFlow {
    template: String,
    default_scope: String,
}

impl RegistrationPathFlow {
    pub fn new(template: impl Into<String>, default_scope: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            default_scope: default_scope.into(),
        }
    }

    fn path_for(&self, scope: &str) -> String {
        self.template.replace(SCOPE_PLACEHOLDER, scope)
    }
}

impl SignUpFlow for RegistrationPathFlow {
    fn registration_path(&self, scope: &str, plan: Option<&Plan>) -> String {
        let path = self.path_for(scope);
        match plan {
            Some(plan) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("plan", &plan.id.to_string())
                    .finish();
                let separator = if path.contains('?') { '&' } else { '?' };
                format!("{}{}{}", path, separator, query)
            }
            None => path,
        }
    }

    fn default_registration_path(&self) -> String {
        self.path_for(&self.default_scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PlanId;

    fn plan() -> Plan {
        Plan {
            id: PlanId::new(2),
            name: "Pro".to_string(),
            price_cents: 1900,
            display_order: 1,
            stripe_id: "pro".to_string(),
        }
    }

    #[test]
    fn scope_and_plan_are_filled_in() {
        let flow = RegistrationPathFlow::new("/{scope}/sign_up", "user");
        assert_eq!(
            flow.registration_path("company", Some(&plan())),
            "/company/sign_up?plan=2"
        );
        assert_eq!(flow.registration_path("company", None), "/company/sign_up");
    }

    #[test]
    fn plan_is_appended_to_existing_query() {
        let flow = RegistrationPathFlow::new("/users/sign_up?scope={scope}", "user");
        assert_eq!(
            flow.registration_path("company", Some(&plan())),
            "/users/sign_up?scope=company&plan=2"
        );
    }

    #[test]
    fn default_path_uses_default_scope_without_plan() {
        let flow = RegistrationPathFlow::new("/{scope}/register", "account");
        assert_eq!(flow.default_registration_path(), "/account/register");
    }
}
