//! Event handling module.
//!
//! This module contains the sync orchestrator: network events that call the
//! todolist API and apply the outcome to the store, and the classification
//! of failed calls into user-visible errors.

mod error;
pub mod network;

pub use error::{SyncError, GENERIC_ERROR_MESSAGE};
pub use network::{Event, Handler};
