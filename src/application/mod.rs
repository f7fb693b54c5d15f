//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (create, update, cancel) are separated from queries (owner
//! resolution, listings, pages).

pub mod handlers;

pub use handlers::subscription::{
    ActionOutcome, Flash, FlashKind, OwnerContext, Redirect, Render, SubscriptionPaths, View,
};
