//! Domain layer - cache connection settings and environment mode.
//!
//! This crate contains plain value types with no client or I/O
//! dependencies. They are shared by the connector and the bootstrap binary.

pub mod connection;
pub mod constants;
pub mod environment;
pub mod error;

pub use connection::ConnectionConfig;
pub use constants::*;
pub use environment::EnvironmentMode;
pub use error::{DomainError, DomainResult};
