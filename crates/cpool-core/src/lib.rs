//! cpool Core - Core abstractions shared by the pool and its drivers
//!
//! This crate provides the fundamental traits and types that the pool and
//! every driver crate depend on. It defines:
//!
//! - `Connection` - Trait for an opaque, poolable connection handle
//! - `ConnectionFactory` - Trait for establishing handles bound to a key
//! - `CpoolError` - The error taxonomy shared across crates

mod connection;
mod error;

pub use connection::*;
pub use error::*;
