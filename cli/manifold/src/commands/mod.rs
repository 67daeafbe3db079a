//! CLI command implementations.

pub mod build;
pub mod check;
pub mod publish;
pub mod resolve;
pub mod target;
