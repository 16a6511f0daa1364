//! Configuration for stackman
//!
//! This crate handles:
//! - Global configuration (`~/.config/stackman/config.toml`)
//! - Stack environment detection (`STACK_FILE`, `STACK_HOME`) and stack file validation

mod error;
mod global;
mod stack;

pub use error::*;
pub use global::*;
pub use stack::*;
