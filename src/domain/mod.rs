//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, errors, timestamps, principals)
//! - `owner` - Owner records and the access rules between owners
//! - `plan` - Pricing plans and listing orders
//! - `subscription` - Subscription aggregate, submitted params, errors

pub mod foundation;
pub mod owner;
pub mod plan;
pub mod subscription;
