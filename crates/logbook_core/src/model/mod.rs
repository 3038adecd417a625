//! Domain models for the local data store.
//!
//! # Responsibility
//! - Define the two persisted record kinds (`Setting`, `Log`).
//! - Define the retention policy vocabulary and the backup envelope.
//!
//! # Invariants
//! - Recognized setting names and retention period names are closed sets,
//!   enforced by enums rather than runtime validation.
//! - `Log::created_at` is set once at construction and never changes.

pub mod backup;
pub mod duration;
pub mod log;
pub mod setting;
