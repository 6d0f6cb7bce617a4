//! Application layer - Generic services that use ports.

// Client session: form state, chat log and the poll loop
pub mod controller;

// Server side: token issuing and status derivation
pub mod jobs;
