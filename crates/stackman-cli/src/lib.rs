//! Command implementations behind the `stackman` binary

pub mod commands;
