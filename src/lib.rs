//! Client-side synchronizer for todolists and their tasks.
//!
//! The crate keeps a normalized local store consistent with a remote
//! todolist API: `api` talks to the server, `state` holds the store,
//! `events` orchestrates each user intent, and `app` wires them together.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod state;
