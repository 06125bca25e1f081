//! Access-scoped query layer.
//!
//! Given an explicit caller identity, computes the visible subset of jobs
//! and submissions and annotates each row with derived counters, badges,
//! and the caller's legal action set. Fails closed on unknown roles.

pub mod identity;
pub mod scope;
