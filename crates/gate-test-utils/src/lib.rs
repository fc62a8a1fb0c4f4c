//! Shared test utilities for the toolgate workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`token`]: unsigned three-segment token builder
//! - [`events`]: authorizer events and gateway request bodies
//! - [`session`]: failing store and a temp-dir backed store fixture

pub mod events;
pub mod session;
pub mod token;
