//! In-memory persistence collaborator.
//!
//! The crate itself never stores records. This module is a small reference
//! host: [`MemRecord`] implements the backing-field traits, [`Schema`] runs
//! the new-record hook, and [`MemoryStore`] saves records and executes
//! [`Predicate`](crate::predicate::Predicate) filters with SQL NULL semantics.
//! It backs the crate's own tests and can serve as a test double for hosts.

mod memory;
mod record;

pub use memory::MemoryStore;
pub use record::{MemRecord, Schema};
