//! xtask command implementations

pub mod completions;

pub mod man;
