//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! The store facade depends on these contracts rather than on concrete
//! encodings, so callers can plug in their own payload format.
//!
//! # Available Ports
//!
//! - [`serializer::Serializer`] - Payload encoding for records passed through
//!   the facade

pub mod serializer;
