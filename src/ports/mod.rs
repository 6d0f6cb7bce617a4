//! Ports - Trait definitions implemented by adapters.

pub mod clock;
pub mod generation;
pub mod provider;
