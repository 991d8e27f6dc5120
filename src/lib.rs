//! Named API-credential profiles for a wrapped CLI.
//!
//! The profile store lives in [`config`]; [`launch`] turns the current
//! profile into the environment of the wrapped process.

pub mod cli;
pub mod config;
pub mod launch;
pub mod logging;
