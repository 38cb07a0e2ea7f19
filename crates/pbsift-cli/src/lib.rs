//! Library half of the `pbsift` binary: config loading, subcommands, atomic
//! output and exit codes.

pub mod commands;
pub mod config;
pub mod exit;
pub mod output;

pub use config::PbsiftConfig;
