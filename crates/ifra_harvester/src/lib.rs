//! Command-line front end for the IFRA transparency-list harvester.
pub mod cli;
pub mod config;
pub mod logging;
