//! Synchronization orchestration against the remote store.
//!
//! This module keeps a locally-held, continuously-updated copy of one
//! entity collection backed by a remote, eventually-consistent store, and
//! exposes it as a single ordered snapshot feed plus validated CRUD
//! operations. The store itself is an external collaborator behind the
//! [`ports::SyncEngine`] port; this module owns merge order, degradation
//! on failure, idempotent conflict handling, and diagnostics de-duplication.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Write-path schema validation in [`validation`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
