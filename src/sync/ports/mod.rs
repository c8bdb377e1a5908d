//! Port contracts for the synchronization boundary.

mod engine;
mod validator;

pub use engine::{SyncEngine, SyncEngineResult};
pub use validator::{RecordValidator, ValidationResult};
