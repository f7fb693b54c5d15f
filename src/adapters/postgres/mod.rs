//! PostgreSQL adapters - Database implementations for the storage ports.
//!
//! - `PostgresOwnerDirectory` - Read-only lookups on the host's owner table
//! - `PostgresSubscriptionRepository` - Subscription persistence
//! - `PostgresPlanReader` - Plan listing and lookup

mod owner_directory;
mod plan_reader;
mod subscription_repository;

pub use owner_directory::PostgresOwnerDirectory;
pub use plan_reader::PostgresPlanReader;
pub use subscription_repository::PostgresSubscriptionRepository;
