//! Configuration: TOML file, environment and defaults

pub mod defaults;
mod settings;

pub use settings::*;
