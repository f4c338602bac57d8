//! Shared infrastructure utilities for the denim wizard.
//!
//! Kept out of the domain-pure `denim-types` crate because it touches the
//! filesystem:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{FileMode, SyncPolicy, WriteOptions, restore_backup, write_atomic};
