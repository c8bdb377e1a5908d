//! Taskstream: offline-first task lifecycle and synchronization engine.
//!
//! This crate provides the core logic for mobile task/questionnaire clients:
//! deciding which tasks are visible at a given instant, ordering and
//! bucketing them for display, normalizing externally-sourced task payloads
//! into the internal model, and keeping an in-memory view consistent with a
//! remote, eventually-consistent store.
//!
//! # Architecture
//!
//! Taskstream follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (stores, feeds, etc.)
//!
//! # Modules
//!
//! - [`task`]: Task entity, visibility filtering, and sort/group engine
//! - [`import`]: Normalization of foreign task payloads
//! - [`sync`]: Subscription orchestration against the remote store
//! - [`view`]: Grouped feed state consumed by the presentation layer

pub mod import;
pub mod sync;
pub mod task;
pub mod view;
