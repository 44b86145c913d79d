//! Type-safe key-value persistence layer for Mercato.
//!
//! Provides a simple, ergonomic API for storing JSON-serialized values in
//! a key-value store. The hosted backend speaks documents; everything this
//! crate sees is a key and a serde-serializable value, so backends are
//! swappable behind the [`KvStore`] trait. An in-memory backend is included
//! for tests and local development.
//!
//! # Example
//!
//! ```rust
//! use mercato_store::{KvStore, MemoryKv};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Settings {
//!     theme: String,
//! }
//!
//! let store = MemoryKv::new();
//! store.set("settings:shop", &Settings { theme: "dark".into() }).unwrap();
//! let settings: Option<Settings> = store.get("settings:shop").unwrap();
//! assert!(settings.is_some());
//! ```

mod error;
mod kv;
mod memory;

pub use error::StoreError;
pub use kv::KvStore;
pub use memory::MemoryKv;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{KvStore, MemoryKv, StoreError};
}
