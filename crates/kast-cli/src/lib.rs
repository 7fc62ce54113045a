//! Library side of the `kast` binary: argument definitions, `kast.json`
//! loading, the subcommand drivers and the diagnostic reporter.

pub mod args;
pub mod config;
pub mod driver;
pub mod reporter;

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod args_tests;

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod reporter_tests;
