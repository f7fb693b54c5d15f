//! Mock port implementations shared by the subscription handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{
    DomainError, ErrorCode, OwnerId, PlanId, Principal, PrincipalId, SubscriptionId, Timestamp,
};
use crate::domain::owner::{CustomerRef, Owner, OwnerKind};
use crate::domain::plan::{Plan, PlanOrdering};
use crate::domain::subscription::{Subscription, SubscriptionDraft};
use crate::ports::{
    BillingCustomerResolver, CurrentOwnerAccessor, LookupCapabilities, OwnerDirectory,
    PlanReader, SignUpFlow, SubscriptionRepository,
};

// ════════════════════════════════════════════════════════════════════════════════
// Fixtures
// ════════════════════════════════════════════════════════════════════════════════

pub fn principal(id: &str) -> Principal {
    Principal::new(PrincipalId::new(id).unwrap(), format!("{}@example.com", id), None)
}

pub fn owner(id: i64) -> Owner {
    Owner::new(OwnerId::new(id), OwnerKind::Account)
}

pub fn owner_with_customer(id: i64, customer: &str) -> Owner {
    owner(id).with_billing_customer(CustomerRef::new(customer).unwrap())
}

pub fn plan(id: i64, price_cents: i64) -> Plan {
    Plan {
        id: PlanId::new(id),
        name: format!("Plan {}", id),
        price_cents,
        display_order: (10 - id) as i32,
        stripe_id: format!("plan_{}", id),
    }
}

pub fn subscription(id: i64, owner_id: i64, plan_id: Option<i64>) -> Subscription {
    let draft = SubscriptionDraft::for_owner(OwnerId::new(owner_id))
        .with_plan(plan_id.map(PlanId::new));
    Subscription::from_draft(SubscriptionId::new(id), draft, Timestamp::now())
}

// ════════════════════════════════════════════════════════════════════════════════
// Owners
// ════════════════════════════════════════════════════════════════════════════════

pub struct MockOwnerDirectory {
    owners: Vec<Owner>,
    slug_lookup: bool,
    fail_id_lookup: bool,
    lookups: AtomicUsize,
}

impl MockOwnerDirectory {
    pub fn new(owners: Vec<Owner>) -> Self {
        Self {
            owners,
            slug_lookup: false,
            fail_id_lookup: false,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn with_slug_lookup(mut self) -> Self {
        self.slug_lookup = true;
        self
    }

    pub fn failing_id_lookup(mut self) -> Self {
        self.fail_id_lookup = true;
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OwnerDirectory for MockOwnerDirectory {
    fn kind(&self) -> OwnerKind {
        OwnerKind::Account
    }

    fn capabilities(&self) -> LookupCapabilities {
        LookupCapabilities::default().with_slug_lookup(self.slug_lookup)
    }

    async fn find_by_id(&self, id: OwnerId) -> Result<Option<Owner>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_id_lookup {
            return Err(DomainError::database("owner lookup failed"));
        }
        Ok(self.owners.iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Owner>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .owners
            .iter()
            .find(|o| o.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn find_for_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Option<Owner>, DomainError> {
        Ok(self
            .owners
            .iter()
            .find(|o| o.principal_id.as_ref() == Some(principal_id))
            .cloned())
    }
}

/// Always answers with a fixed owner record.
pub struct FixedAccessor(pub Option<Owner>);

#[async_trait]
impl CurrentOwnerAccessor for FixedAccessor {
    async fn current_owner(&self, _principal: &Principal) -> Result<Option<Owner>, DomainError> {
        Ok(self.0.clone())
    }
}

/// Reads the customer reference off the owner record.
pub struct RecordCustomerResolver {
    pub fail: bool,
}

#[async_trait]
impl BillingCustomerResolver for RecordCustomerResolver {
    async fn find_customer(&self, owner: &Owner) -> Result<Option<CustomerRef>, DomainError> {
        if self.fail {
            return Err(DomainError::new(ErrorCode::InternalError, "billing unavailable"));
        }
        Ok(owner.billing_customer.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Subscriptions
// ════════════════════════════════════════════════════════════════════════════════

pub struct MockSubscriptionRepository {
    subscriptions: Mutex<Vec<Subscription>>,
    fail_writes: bool,
}

impl MockSubscriptionRepository {
    pub fn new() -> Self {
        Self::with(Vec::new())
    }

    pub fn with(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: Mutex::new(subscriptions),
            fail_writes: false,
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn all(&self) -> Vec<Subscription> {
        self.subscriptions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepository {
    async fn insert(&self, draft: &SubscriptionDraft) -> Result<Subscription, DomainError> {
        if self.fail_writes {
            return Err(DomainError::validation("base", "card was declined"));
        }
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let id = SubscriptionId::new(subscriptions.len() as i64 + 100);
        let subscription = Subscription::from_draft(id, draft.clone(), Timestamp::now());
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::validation("base", "card was declined"));
        }
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions.iter_mut().find(|s| s.id == subscription.id) {
            Some(existing) => {
                *existing = subscription.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::SubscriptionNotFound, "missing")),
        }
    }

    async fn find_for_owner(
        &self,
        owner_id: OwnerId,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.owner_id == owner_id && s.id == id)
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: OwnerId) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.owner_id == owner_id)
            .cloned())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Plans & sign-up
// ════════════════════════════════════════════════════════════════════════════════

pub struct MockPlanReader {
    plans: Vec<Plan>,
}

impl MockPlanReader {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }
}

#[async_trait]
impl PlanReader for MockPlanReader {
    async fn list(&self, ordering: PlanOrdering) -> Result<Vec<Plan>, DomainError> {
        let mut plans = self.plans.clone();
        ordering.sort(&mut plans);
        Ok(plans)
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_stripe_id(&self, stripe_id: &str) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.iter().find(|p| p.stripe_id == stripe_id).cloned())
    }
}

pub struct MockSignUpFlow;

impl SignUpFlow for MockSignUpFlow {
    fn registration_path(&self, scope: &str, plan: Option<&Plan>) -> String {
        match plan {
            Some(plan) => format!("/{}/sign_up?plan={}", scope, plan.id),
            None => format!("/{}/sign_up", scope),
        }
    }

    fn default_registration_path(&self) -> String {
        "/sign_up".to_string()
    }
}
