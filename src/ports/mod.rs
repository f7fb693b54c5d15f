//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Identity
//!
//! - `SessionValidator` - bearer token to principal
//! - `CurrentOwnerAccessor` - principal to its own owner record
//!
//! ## Persistence
//!
//! - `OwnerDirectory` - owner lookups by id, slug, or principal
//! - `SubscriptionRepository` - owner-scoped subscription storage
//! - `PlanReader` - read-only plan catalog
//!
//! ## Collaborators
//!
//! - `BillingCustomerResolver` - owner to external billing customer
//! - `SignUpFlow` - registration paths for anonymous visitors

mod billing_customer;
mod current_owner;
mod owner_directory;
mod plan_reader;
mod session_validator;
mod signup_flow;
mod subscription_repository;

pub use billing_customer::BillingCustomerResolver;
pub use current_owner::{CurrentOwnerAccessor, OwnerAccessorRegistry};
pub use owner_directory::{LookupCapabilities, OwnerDirectory};
pub use plan_reader::PlanReader;
pub use session_validator::SessionValidator;
pub use signup_flow::SignUpFlow;
pub use subscription_repository::SubscriptionRepository;
