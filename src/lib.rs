//! Setenv - load a stage-specific `.env` file into the process environment.
//!
//! This library provides:
//! - Stage resolution and `.env` / `.env.<stage>` file selection
//! - Dotenv parsing into an ordered mapping
//! - Optional `${VAR}` expansion and backtick shell substitution, in a
//!   caller-chosen order when both are enabled
//! - Merging the result into the process environment with one log line per
//!   variable
//!
//! # Example
//!
//! ```no_run
//! use setenv_cli::config::{HostOptions, StageSignals, load_host_config};
//! use setenv_cli::env::OsEnvironment;
//! use setenv_cli::host::DefaultHost;
//! use std::path::Path;
//!
//! let host_config = load_host_config(Path::new("setenv.toml")).unwrap();
//! let mut env = OsEnvironment::new();
//! let signals = StageSignals::collect(&env, &HostOptions::default());
//! let config = host_config.dotenv.into_configuration(&signals).unwrap();
//!
//! let report = setenv_cli::plugin::run(&DefaultHost::new(), &config, &mut env).unwrap();
//! println!("Loaded {} variables from {}", report.mapping.len(), report.path.path.display());
//! ```

pub mod config;
pub mod dotenv;
pub mod env;
pub mod error;
pub mod exec;
pub mod host;
pub mod mapping;
pub mod plugin;
pub mod resolve;
pub mod transform;

pub use error::{OrderProblem, Result, SetenvError};
pub use mapping::EnvMapping;
pub use plugin::{RunReport, run};
