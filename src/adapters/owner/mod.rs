//! Owner adapters built on top of an `OwnerDirectory`.
//!
//! - `current_owner` - principal to owner through the directory
//! - `billing_customer` - customer reference stored on the owner record

mod billing_customer;
mod current_owner;

pub use billing_customer::OwnerRecordCustomerResolver;
pub use current_owner::{default_accessor_registry, DirectoryOwnerAccessor};
