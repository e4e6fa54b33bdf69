//! # Bitmask Attributes
//!
//! Store a small, fixed set of named flags (say the marketing channels `web`,
//! `print`, `email`, `phone`) in one integer column instead of a join table,
//! expose them to application code as a live label collection, and filter
//! records by combinations of them.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Predicates (predicate/)                                    │
//! │  - Six filter generators per attribute                      │
//! │  - Abstract tree, SQL rendering, in-memory evaluation       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attribute (attribute/)                                     │
//! │  - Binds a codec to a column of a host record               │
//! │  - Live collection with write-back and rollback             │
//! │  - Defaults and presence queries                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Codec (codec.rs, mask.rs, label.rs)                        │
//! │  - labels ↔ arbitrary-width mask, zero value handling       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Collaborators
//!
//! The host record type implements [`BackingField`] (read/write an integer
//! column) and [`BitmaskHost`] (own a [`ValueCache`]). Record types opt in
//! explicitly by holding [`BitmaskAttribute`] definitions; nothing is
//! registered globally. Query execution belongs to the host as well: it
//! receives a [`Predicate`] and translates it, e.g. with [`predicate::sql`].
//! [`store`] is a complete in-memory host used for testing.
//!
//! ## Example
//!
//! ```
//! use bitmask_attrs::{BitmaskAttribute, Match, Mask};
//! use bitmask_attrs::store::{MemRecord, MemoryStore};
//!
//! let medium = BitmaskAttribute::builder("medium")
//!     .values(["web", "print", "email", "phone"])
//!     .build()
//!     .unwrap();
//!
//! let mut record = MemRecord::new();
//! medium.assign(&mut record, ["web", "print"]).unwrap();
//! assert_eq!(medium.to_mask(&mut record).unwrap(), Mask::from(3u64));
//! assert!(medium.has(&mut record, ["print"], Match::All).unwrap());
//!
//! let mut store = MemoryStore::new();
//! let id = store.save(&mut record);
//! let filter = medium.with_exact(["web", "print"]).unwrap();
//! assert_eq!(store.filter_ids(&filter), vec![id]);
//! ```
//!
//! ## Module Overview
//!
//! - [`codec`]: label ↔ mask arithmetic
//! - [`mask`]: arbitrary-width masks
//! - [`label`]: the label type
//! - [`attribute`]: attribute binding, live collection, defaults
//! - [`predicate`]: predicate tree, generators, SQL rendering
//! - [`config`]: TOML attribute definitions
//! - [`store`]: in-memory record store
//! - [`error`]: error types

pub mod attribute;
pub mod codec;
pub mod config;
pub mod error;
pub mod label;
pub mod mask;
pub mod predicate;
pub mod store;

pub use attribute::{
    AttributeBuilder, BackingField, BitmaskAttribute, BitmaskHost, Match, ValueCache,
    ValueCollection,
};
pub use codec::BitmaskCodec;
pub use config::AttributeConfig;
pub use error::{BitmaskError, Result};
pub use label::Label;
pub use mask::Mask;
pub use predicate::Predicate;
