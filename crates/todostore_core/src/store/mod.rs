//! Todo store layer.
//!
//! # Responsibility
//! - Own identity and uniqueness bookkeeping on top of the backend contract.
//! - Keep UI/serving layers decoupled from persistence details.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `DuplicateText`) in
//!   addition to backend transport errors.

pub mod todo_store;
