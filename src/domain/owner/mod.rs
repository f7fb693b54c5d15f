//! Owner domain module.
//!
//! Owners are the entities that hold subscriptions. This module defines the
//! owner entity, the configurable owner kind, and the access rules deciding
//! whether a principal may act on a given owner.

mod access;
mod entity;
mod kind;

pub use access::{
    is_same_owner, shared_customer_access, AccessDenial, AccessGrant, ResolvedOwner,
};
pub use entity::{CustomerRef, Owner};
pub use kind::OwnerKind;
