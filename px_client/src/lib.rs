//! Internal modules for the Pixdex terminal client.
//!
//! This library provides the HTTP catalog provider, command parsing and the
//! lobby/game screens used by the px_client binary.

pub mod api_client;
pub mod app;
pub mod commands;
