//! Reading `.env` files.
//!
//! This module handles:
//! - Reading the resolved file from disk
//! - Parsing dotenv text into an ordered [`EnvMapping`]

pub mod parser;

pub use parser::parse_dotenv_str;

use crate::error::{Result, SetenvError};
use crate::mapping::EnvMapping;
use std::path::Path;

/// Read and parse a dotenv file.
///
/// Read and parse failures both become [`SetenvError::ParseError`] with the
/// underlying message kept as is.
pub fn load_env_file(path: &Path) -> Result<EnvMapping> {
	let content = std::fs::read_to_string(path).map_err(|source| SetenvError::ParseError {
		path: path.to_path_buf(),
		message: source.to_string(),
	})?;

	parse_dotenv_str(&content).map_err(|message| SetenvError::ParseError {
		path: path.to_path_buf(),
		message,
	})
}
