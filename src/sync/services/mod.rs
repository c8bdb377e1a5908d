//! Orchestration services for the synchronization boundary.

mod orchestrator;

pub use orchestrator::{OrchestratorConfig, Subscription, SyncOrchestrator};
