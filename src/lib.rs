//! `dockhand`: short verbs for Docker and Docker Compose.
//!
//! The crate is organised like a small pipeline. `cli` owns the verb registry,
//! dispatch and completion; `core` holds the pure pieces (manifest resolution,
//! argument classification, target resolution, the confirmation gate);
//! `system` talks to the container runtime as an external process.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Set to `true` when the user interrupts a running command (Ctrl+C).
pub type CancellationToken = Arc<AtomicBool>;

/// Verb registry, dispatch, handlers and completion.
pub mod cli;
/// Named constants shared across the crate.
pub mod constants;
/// Logic that never spawns a process on its own.
pub mod core;
/// Invocation and configuration models.
pub mod models;
pub mod system;

#[cfg(test)]
mod test_utils;
