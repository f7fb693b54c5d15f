//! Action outcomes.
//!
//! Every action either redirects or renders a view. Both may carry a flash
//! message for the next page.

use serde::Serialize;

/// User-facing messages set by the actions.
pub mod messages {
    pub const UPGRADED: &str = "You've been successfully upgraded.";
    pub const TRANSACTION_PROBLEM: &str = "There was a problem processing this transaction.";
    pub const CANCELLED: &str = "You've successfully cancelled your subscription.";
    pub const PAYMENT_REQUIRED: &str = "Please enter payment information to upgrade.";
    pub const UPDATED: &str = "You've successfully updated your subscription.";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Notice,
    Error,
}

/// One-shot message shown on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Notice,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Views an action can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Index,
    New,
    Show,
    Edit,
    Unauthorized,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Index => "index",
            View::New => "new",
            View::Show => "show",
            View::Edit => "edit",
            View::Unauthorized => "unauthorized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
    pub flash: Option<Flash>,
    /// Path to come back to after signing up.
    pub return_to: Option<String>,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            flash: None,
            return_to: None,
        }
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }

    pub fn with_return_to(mut self, path: impl Into<String>) -> Self {
        self.return_to = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render<T> {
    pub view: View,
    pub flash: Option<Flash>,
    pub body: T,
}

/// Result of a subscription action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome<T> {
    Redirect(Redirect),
    Render(Render<T>),
}

impl<T> ActionOutcome<T> {
    pub fn redirect(redirect: Redirect) -> Self {
        ActionOutcome::Redirect(redirect)
    }

    pub fn render(view: View, body: T) -> Self {
        ActionOutcome::Render(Render {
            view,
            flash: None,
            body,
        })
    }

    pub fn render_with_flash(view: View, flash: Flash, body: T) -> Self {
        ActionOutcome::Render(Render {
            view,
            flash: Some(flash),
            body,
        })
    }

    /// Redirect target, if this outcome redirects.
    pub fn location(&self) -> Option<&str> {
        match self {
            ActionOutcome::Redirect(r) => Some(&r.location),
            ActionOutcome::Render(_) => None,
        }
    }

    pub fn flash(&self) -> Option<&Flash> {
        match self {
            ActionOutcome::Redirect(r) => r.flash.as_ref(),
            ActionOutcome::Render(r) => r.flash.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_builder_sets_fields() {
        let outcome: ActionOutcome<()> = ActionOutcome::redirect(
            Redirect::to("/a")
                .with_flash(Flash::notice(messages::CANCELLED))
                .with_return_to("/b"),
        );

        assert_eq!(outcome.location(), Some("/a"));
        assert_eq!(outcome.flash().map(|f| f.kind), Some(FlashKind::Notice));
    }

    #[test]
    fn render_has_no_location() {
        let outcome = ActionOutcome::render(View::Show, ());
        assert!(outcome.location().is_none());
        assert!(outcome.flash().is_none());
    }

    #[test]
    fn view_names_match_templates() {
        assert_eq!(View::Unauthorized.as_str(), "unauthorized");
        assert_eq!(
            serde_json::to_string(&View::Edit).unwrap(),
            "\"edit\""
        );
    }
}
