// src/cli/handlers/mod.rs

//! One module per verb family. Every handler has the signature of
//! `registry::HandlerFn`.

pub mod commons;
pub mod compose;
pub mod docker;
pub mod init;
/// `dclt`: follow the logs of services matching patterns.
pub mod log_tail;
/// `dcpr`: build properties reported by each service.
pub mod properties;
pub mod quick;
