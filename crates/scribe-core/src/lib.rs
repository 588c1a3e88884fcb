//! # Scribe Core
//!
//! The domain layer of the Scribe blog editor backend.
//! Entities, ports and the services built on top of them. No infrastructure
//! dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
