//! In-memory adapters.
//!
//! Thread-safe, non-persistent implementations of the persistence ports.
//! Used in tests and for local runs without a database, optionally seeded
//! from a YAML file.

mod owner_directory;
mod plan_catalog;
mod seed;
mod subscription_repository;

pub use owner_directory::InMemoryOwnerDirectory;
pub use plan_catalog::InMemoryPlanCatalog;
pub use seed::{OwnerSeed, SeedData};
pub use subscription_repository::InMemorySubscriptionRepository;
