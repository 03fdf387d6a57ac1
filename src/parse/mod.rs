//! Text parsing of external tool output.

mod client_info;
mod log_scan;
mod status;
pub use client_info::*;
pub use log_scan::*;
pub use status::*;

#[cfg(test)]
mod log_scan_test;
