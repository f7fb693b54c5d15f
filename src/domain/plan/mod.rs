//! Plan domain module.
//!
//! Pricing tiers and the orderings used to list them.

mod entity;

pub use entity::{Plan, PlanOrdering};
