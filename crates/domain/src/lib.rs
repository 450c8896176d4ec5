//! Domain layer for the load broker
//!
//! Contains the freight load and booking entities, value objects, and
//! domain errors. This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
