//! Stripe SaaS - owner-scoped subscription management
//!
//! Resolves which owner (user, account, company, ...) a request acts for,
//! checks that the caller may act for it, and drives the subscription
//! pages: plan listing, sign-up hand-off, create, show, change plan and
//! cancel.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
