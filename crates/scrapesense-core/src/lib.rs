//! ScrapeSense Core — error taxonomy and runtime configuration.

pub mod config;
pub mod error;

pub use config::{RunMode, ScrapeSenseConfig};
pub use error::{Error, Result};
