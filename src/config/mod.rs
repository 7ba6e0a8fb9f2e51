//! Configuration module

pub mod cli;
pub mod settings;

pub use cli::{BootMode, CliArgs, RadioBackend};
pub use settings::{BootNetwork, Settings};
