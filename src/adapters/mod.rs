//! Adapters - Concrete implementations of ports.

pub mod canned;
pub mod system;

#[cfg(feature = "server")]
pub mod http;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "client")]
pub mod terminal;
