//! Core use-case services.
//!
//! # Responsibility
//! - Reconcile goals/tasks/completions/moods by their natural keys.
//! - Aggregate month state into transport shapes and apply submitted state.
//!
//! # See also
//! - `repo::unit_of_work` for the atomicity boundary each operation uses.

pub mod month_service;
pub mod reconcile;
pub mod stats;
