//! email-preview CLI library exports.
//!
//! The binary is a thin clap front end over these modules; tests drive the
//! command implementations directly.

pub mod commands;
pub mod config;
pub mod errors;
pub mod session;
