//! Subcommand implementations for the taxa binary.

pub mod health;
pub mod serve;
