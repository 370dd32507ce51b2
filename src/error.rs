use std::path::PathBuf;

/// Library-level structured errors for setenv.
///
/// Every variant is fatal to a run. The orchestrator turns whichever one
/// occurs into a single `setenv: `-prefixed report through the host's
/// [`ErrorFactory`](crate::host::ErrorFactory).
#[derive(Debug, thiserror::Error)]
pub enum SetenvError {
	#[error("custom.setenv.dotenv.{field} must be a string")]
	InvalidConfig { field: &'static str },

	#[error("Could not determine path for .env")]
	PathNotFound { candidates: Vec<PathBuf> },

	#[error("{message}")]
	ParseError { path: PathBuf, message: String },

	#[error("custom.setenv.dotenv.order {problem}")]
	InvalidOrder { problem: OrderProblem },

	#[error("Failed to set {name}: {message}")]
	MergeError { name: String, message: String },

	#[error("Shell command failed for {name}: {command}")]
	ShellSpawnFailed {
		name: String,
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Shell command for {name} exited with code {exit_code}: {command}{}", stderr_suffix(.stderr))]
	ShellCommandFailed {
		name: String,
		command: String,
		exit_code: i32,
		stderr: String,
	},

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },

	#[error("Failed to read host config file: {path}")]
	HostConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse host config file: {path}")]
	HostConfigParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

/// Why a `custom.setenv.dotenv.order` value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderProblem {
	/// No order given, or the value is not a list.
	NotAnArray,
	/// The list does not have exactly two items.
	WrongLength(usize),
	/// Two items, but not `shell,expand` or `expand,shell`.
	InvalidTokens(String),
}

impl std::fmt::Display for OrderProblem {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OrderProblem::NotAnArray => f.write_str("must be an array"),
			OrderProblem::WrongLength(_) => f.write_str("must have two items"),
			OrderProblem::InvalidTokens(_) => f.write_str("has an invalid order"),
		}
	}
}

fn stderr_suffix(stderr: &str) -> String {
	let trimmed = stderr.trim();
	if trimmed.is_empty() {
		String::new()
	} else {
		format!(" ({trimmed})")
	}
}

/// Result type alias using SetenvError.
pub type Result<T> = std::result::Result<T, SetenvError>;
