//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - OIDC and mock session validation
//! - `http` - axum routes, middleware, DTOs
//! - `memory` - in-memory storage, optionally seeded from YAML
//! - `owner` - current-owner accessors and billing customer lookup
//! - `postgres` - PostgreSQL storage
//! - `signup` - registration path flow

pub mod auth;
pub mod http;
pub mod memory;
pub mod owner;
pub mod postgres;
pub mod signup;
