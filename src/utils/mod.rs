//! Utility modules for the command-line player

pub mod logging;

pub use logging::init_logger;
