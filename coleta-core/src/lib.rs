//! Core types, ports, and view models for the coleta collection point finder.

/// Bundle of remote ports a service is built from.
pub mod backend;
/// Detail screen view model.
pub mod detail;
/// Discovery (list + map) screen view model.
pub mod discovery;
/// Freshness tickets for discarding superseded asynchronous results.
pub mod freshness;
/// Outbound intents handed to navigation and native collaborators.
pub mod intent;
/// Domain models and identifiers.
pub mod model;
/// Traits describing the remote and device collaborators.
pub mod ports;
/// Category selection and the filter state it owns.
pub mod selection;
/// High-level service facade used by front ends.
pub mod service;

pub use backend::*;
pub use detail::*;
pub use discovery::*;
pub use freshness::*;
pub use intent::*;
pub use model::*;
pub use ports::*;
pub use selection::*;
pub use service::*;

#[cfg(test)]
mod testing;
