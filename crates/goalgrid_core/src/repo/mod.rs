//! Storage capability contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the tracker storage capability used by services.
//! - Define the unit-of-work seam that gives services atomic commits.
//! - Isolate SQLite query details from reconciliation logic.
//!
//! # Invariants
//! - "Active" lookups never return soft-deleted goals or tasks.
//! - Writes are keyed by natural keys and never produce duplicate rows.

pub mod sqlite_store;
pub mod store;
pub mod unit_of_work;
