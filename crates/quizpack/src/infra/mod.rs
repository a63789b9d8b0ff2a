//! Infrastructure adapters: archive IO and configuration.

pub mod archive;
pub mod config;
