//! Domain records and transport shapes for monthly goal tracking.
//!
//! # Responsibility
//! - Define persisted records (user, goal, task, completion, mood).
//! - Define the boundary transport shapes exchanged with callers.
//!
//! # Invariants
//! - Goals and tasks are addressed by caller-supplied external keys; the
//!   numeric `RecordId` is storage-assigned.
//! - Deletion is a soft-delete lifecycle marker, never a physical delete.

pub mod record;
pub mod transport;
