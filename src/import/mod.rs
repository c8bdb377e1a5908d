//! Normalization of externally-sourced task payloads.
//!
//! The upstream scheduling API supplies date-grouped, loosely-typed task
//! collections. This module models every payload shape as an explicit
//! union at the boundary and converts each payload into a complete
//! internal [`crate::task::domain::Task`] record, deriving deterministic
//! record identity when the source supplies none.
//!
//! - Foreign payload model in [`domain`]
//! - Conversion service in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
