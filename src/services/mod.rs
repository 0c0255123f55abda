//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business rules so route handlers can stay focused on
//! request parsing, auth plumbing and status mapping. Content records are
//! handled by `crate::loader` and `crate::writer` directly.

pub mod auth;
pub mod contacts;
pub mod subscriptions;
