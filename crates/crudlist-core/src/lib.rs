//! crudlist-core: Core library for crudlist
//!
//! Provides the record model, immutable collection snapshots, the
//! replace-on-write store, and field validation. No daemon, no database -
//! state lives in memory for as long as its owner does.

pub mod collection;
pub mod config;
pub mod error;
pub mod id;
pub mod record;
pub mod seed;
pub mod store;
pub mod validation;

pub use collection::{Change, Collection};
pub use config::Config;
pub use error::Error;
pub use id::{IdGenerator, lowest_unused, parse_id};
pub use record::Record;
pub use store::Store;
pub use validation::{FieldEvent, FieldPhase, FieldState, Form, Rule, validate_record_input};

/// Result type for crudlist operations
pub type Result<T> = std::result::Result<T, Error>;
