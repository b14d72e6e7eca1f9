//! CLI subcommand implementations.

pub mod browse;
pub mod categories;
pub mod category;
pub mod tree;
