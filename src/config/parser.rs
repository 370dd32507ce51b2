use crate::config::types::HostConfig;
use crate::error::{Result, SetenvError};
use std::path::Path;

/// Default host configuration file name, looked up in the current directory.
pub const HOST_CONFIG_FILE: &str = "setenv.toml";

/// Parse a host config file from the given path.
pub fn parse_host_config_file(path: &Path) -> Result<HostConfig> {
	let content = std::fs::read_to_string(path).map_err(|source| SetenvError::HostConfigRead {
		path: path.to_path_buf(),
		source,
	})?;

	parse_host_config_str(&content, path)
}

/// Parse a host config file, treating a missing file as an empty config.
pub fn load_host_config(path: &Path) -> Result<HostConfig> {
	if path.exists() {
		parse_host_config_file(path)
	} else {
		tracing::debug!(path = %path.display(), "no host config file, using defaults");
		Ok(HostConfig::default())
	}
}

/// Parse a host config from a string (useful for testing).
pub fn parse_host_config_str(content: &str, path: &Path) -> Result<HostConfig> {
	toml::from_str(content).map_err(|source| SetenvError::HostConfigParse {
		path: path.to_path_buf(),
		source,
	})
}
