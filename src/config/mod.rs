//! Host configuration for setenv.
//!
//! This module handles:
//! - TOML host file parsing (`setenv.toml`)
//! - Stage signal collection and precedence
//! - Validation into an immutable [`Configuration`]

pub mod parser;
pub mod stage;
pub mod types;

pub use parser::{HOST_CONFIG_FILE, load_host_config, parse_host_config_file, parse_host_config_str};
pub use stage::{DEFAULT_STAGE, StageSignals};
pub use types::{Configuration, DotenvSection, HostConfig, HostOptions};
