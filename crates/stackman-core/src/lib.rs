//! Core logic for stackman
//!
//! This crate provides:
//! - Project detection and compose project name sanitization
//! - Installing the starter `public_html` template into a project
//! - Turning runtime errors into short, actionable messages
//! - `StackManager`, which ties the runtime client, compose runner and stack
//!   environment together

mod error;
mod manager;
mod project;
mod template;
mod user_error;

pub use error::*;
pub use manager::*;
pub use project::*;
pub use template::*;
pub use user_error::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
