//! Subcommand implementations.

pub mod browse;
pub mod common;
pub mod find;
pub mod mounts;
pub mod pack;
