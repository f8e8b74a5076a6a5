// src/core/mod.rs

/// Flag and target classification of raw arguments.
pub mod arg_parser;
/// Which compose manifest an invocation operates on.
pub mod compose_file;
/// `config.toml` loading, with defaults written on first use.
pub mod config_loader;
/// The confirmation checkpoint before mutating operations.
pub mod gate;
/// The configuration directory.
pub mod paths;
/// Probing and reporting build properties.
pub mod properties;
/// Colors and the optional listing formatter.
pub mod style;
/// Target resolution against a discovered universe.
pub mod targets;
