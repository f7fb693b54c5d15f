//! Named subscription paths.
//!
//! Owner-scoped paths live under `{mount}/owners/{owner}/subscriptions`; the
//! owner-less pricing entry points under `{mount}/subscriptions`.

use url::Url;

use crate::domain::foundation::SubscriptionId;
use crate::domain::owner::Owner;

const ORIGIN: &str = "http://localhost/";
const OWNER_PLACEHOLDER: &str = "{owner}";
const SUBSCRIPTION_PLACEHOLDER: &str = "{subscription}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionPaths {
    mount: String,
    base: Url,
    after_create_template: Option<String>,
}

impl SubscriptionPaths {
    /// `mount` is prefixed to every path; trailing slashes are dropped.
    pub fn new(mount: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let mount = mount.as_ref().trim_end_matches('/').to_string();
        let base = Url::parse(ORIGIN)?.join(&format!("{}/", mount))?;
        Ok(Self {
            mount,
            base,
            after_create_template: None,
        })
    }

    /// Template for the post-create redirect, with `{owner}` and
    /// `{subscription}` placeholders.
    pub fn with_after_create(mut self, template: Option<String>) -> Self {
        self.after_create_template = template.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn index(&self, owner: &Owner) -> String {
        self.locate(&self.owner_segments(owner, &[]), &[])
    }

    pub fn new_for_owner(&self, owner: &Owner, plan: Option<&str>) -> String {
        self.locate(&self.owner_segments(owner, &["new"]), &plan_query(plan))
    }

    pub fn show(&self, owner: &Owner, id: SubscriptionId) -> String {
        let id = id.to_string();
        self.locate(&self.owner_segments(owner, &[&id]), &[])
    }

    pub fn edit(&self, owner: &Owner, id: SubscriptionId) -> String {
        let id = id.to_string();
        self.locate(&self.owner_segments(owner, &[&id, "edit"]), &[])
    }

    /// Edit page opened on the card form, preselecting the target plan.
    pub fn edit_for_card(&self, owner: &Owner, id: SubscriptionId, plan: &str) -> String {
        let id = id.to_string();
        self.locate(
            &self.owner_segments(owner, &[&id, "edit"]),
            &[("update", "card"), ("plan", plan)],
        )
    }

    /// Owner-less new path, the entry point from the pricing page.
    pub fn unscoped_new(&self, plan: Option<&str>) -> String {
        self.locate(&["subscriptions", "new"], &plan_query(plan))
    }

    /// Where to go after a successful create.
    pub fn after_create(&self, owner: &Owner, id: SubscriptionId) -> String {
        match &self.after_create_template {
            Some(template) => template
                .replace(OWNER_PLACEHOLDER, &self.segment(&owner.to_param()))
                .replace(SUBSCRIPTION_PLACEHOLDER, &id.to_string()),
            None => self.show(owner, id),
        }
    }

    fn owner_segments(&self, owner: &Owner, rest: &[&str]) -> Vec<String> {
        let mut segments = vec![
            "owners".to_string(),
            owner.to_param(),
            "subscriptions".to_string(),
        ];
        segments.extend(rest.iter().map(|s| s.to_string()));
        segments
    }

    /// Path below the mount with percent-encoded segments and query.
    fn locate<S: AsRef<str>>(&self, segments: &[S], query: &[(&str, &str)]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }

    /// A single percent-encoded path segment.
    fn segment(&self, value: &str) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().push(value);
        }
        url.path().trim_start_matches('/').to_string()
    }
}

fn plan_query(plan: Option<&str>) -> Vec<(&str, &str)> {
    match plan.filter(|p| !p.is_empty()) {
        Some(plan) => vec![("plan", plan)],
        None => Vec::new(),
    }
}
