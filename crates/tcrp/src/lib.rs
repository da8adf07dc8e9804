//! Command-line front end for the tropical-cyclone return-period engine
//!
//! Reads a settings file, the track ensemble and the location table, runs
//! [`tcrp_core`] and writes one CSV table per location.

pub mod commands;
pub mod io;
pub mod logging;
pub mod settings;
pub mod util;

pub use logging::init_logging;
pub use settings::{Overrides, Settings};
