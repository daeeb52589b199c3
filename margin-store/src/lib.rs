//! Preference store backends for the KRA-Ready dashboard.
//!
//! Register the factories with a [`margin_core::StoreRegistry`] to make the
//! `"sqlite"` and `"memory"` backends available.

pub mod factory;
pub mod memory;
pub mod sqlite;

pub use factory::{MemoryStoreFactory, SqliteStoreFactory, register_builtin_backends};
pub use memory::MemoryPreferenceStore;
pub use sqlite::SqlitePreferenceStore;
