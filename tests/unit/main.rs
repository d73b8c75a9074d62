//! Unit test harness for nfs-scan.
//!
//! Configuration parsing and validation through the public API.

mod config_parsing;
mod config_validation;
