//! Task lifecycle domain for Taskstream.
//!
//! This module owns the central Task entity and the pure logic layered on
//! top of it: identity and deterministic key derivation, classification and
//! status parsing, time/recall predicates, the active-view visibility
//! filter, and the sort/group engine that buckets tasks by calendar day and
//! due-by label. Everything here is synchronous, side-effect free, and safe
//! to re-invoke; infrastructure concerns live in [`crate::sync`].
//!
//! - Domain types in [`domain`]

pub mod domain;

#[cfg(test)]
mod tests;
