//! Soak-test harness for a Jepsen-style workload against a key-value cluster.
//!
//! Each iteration recovers the cluster from leftover fault injection, starts
//! it, optionally flushes its data, runs the workload and validates node logs
//! and client sessions. Failed iterations are archived under a timestamped
//! evidence directory and reported by email.

mod checks;
mod command;
mod config;
mod errors;
mod evidence;
mod harness;
mod notify;
mod parse;

pub mod cli;
pub mod cluster;
pub mod tools;

pub use checks::*;
pub use command::*;
pub use config::*;
pub use errors::*;
pub use evidence::*;
pub use harness::*;
pub use notify::*;
pub use parse::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
