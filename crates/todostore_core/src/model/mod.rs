//! Domain model for todo records.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every record is identified by a stable `TodoId`.
//! - Deletion is a hard delete; a deleted record's text becomes reusable,
//!   its id does not.

pub mod todo;
