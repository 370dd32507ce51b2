use crate::config::stage::StageSignals;
use crate::error::{Result, SetenvError};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level host configuration from a `setenv.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostConfig {
	/// The `[dotenv]` table. Absent means every option takes its default.
	#[serde(default)]
	pub dotenv: DotenvSection,
}

/// The `[dotenv]` table as written by the host, before validation.
///
/// `dir_path` and `order` stay untyped so that a wrong type is reported as a
/// setenv error rather than a TOML decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotenvSection {
	/// Directory containing the `.env` files.
	#[serde(default, alias = "dir_path", alias = "dir-path")]
	pub dir_path: Option<toml::Value>,

	/// Run backtick values as shell commands.
	#[serde(default)]
	pub shell: bool,

	/// Expand `${VAR}` references.
	#[serde(default)]
	pub expand: bool,

	/// Which transform runs first when both are enabled.
	#[serde(default)]
	pub order: Option<toml::Value>,
}

/// Options the caller passes alongside the host file.
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
	pub stage: Option<String>,
	pub env: Option<String>,
	pub debug: bool,
}

/// Validated, immutable input for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
	pub dir_path: Option<PathBuf>,
	pub shell: bool,
	pub expand: bool,
	pub order: Option<Vec<String>>,
	pub stage: String,
	/// Log values as well as names when merging.
	pub debug: bool,
}

impl DotenvSection {
	/// Validate the section and combine it with the resolved stage signals.
	pub fn into_configuration(self, signals: &StageSignals) -> Result<Configuration> {
		let dir_path = match self.dir_path {
			None => None,
			Some(toml::Value::String(path)) if path.is_empty() => None,
			Some(toml::Value::String(path)) => Some(PathBuf::from(path)),
			Some(_) => return Err(SetenvError::InvalidConfig { field: "dirPath" }),
		};

		// Anything that is not a list is treated as missing; the pipeline
		// rejects it only if both transforms are enabled.
		let order = match self.order {
			Some(toml::Value::Array(items)) => Some(
				items
					.into_iter()
					.map(|item| match item {
						toml::Value::String(token) => token,
						other => other.to_string(),
					})
					.collect(),
			),
			_ => None,
		};

		Ok(Configuration {
			dir_path,
			shell: self.shell,
			expand: self.expand,
			order,
			stage: signals.resolve_stage(),
			debug: signals.debug,
		})
	}
}
