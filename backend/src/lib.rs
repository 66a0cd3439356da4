//! Backend library for the learning platform.
//!
//! Hexagonal layout: [`domain`] owns the enrollment workflow, plan
//! calculator and quiz recorder; [`inbound`] adapts HTTP onto the
//! driving ports; [`outbound`] implements the driven store ports;
//! [`server`] wires everything into an Actix application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
/// Request-correlation middleware.
pub use middleware::Trace;
