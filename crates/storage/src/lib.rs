//! Storage abstraction and implementations for the QMS toolkit.
//!
//! This crate provides a trait-based storage interface with a JSON file
//! reference implementation.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;

pub use trait_::{Storage, StorageError, Result, StateKind, save_state_as, load_state_as};
pub use json_storage::JsonStorage;
