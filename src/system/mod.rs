//! # System Interaction Layer
//!
//! Boundary between the dispatcher and the outside world.
//!
//! ## Modules
//!
//! - **`executor`**: spawns external processes. Handles graceful cancellation
//!   (`Ctrl+C`), output capturing and piping listings through a formatter.
//! - **`runtime`**: builds the concrete `docker` / `docker compose` invocations and
//!   discovers containers and services.

/// Spawning, streaming and capturing external commands.
pub mod executor;
/// `docker` and `docker compose` invocations, plus discovery.
pub mod runtime;
