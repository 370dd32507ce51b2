//! Running a child process under the merged environment.
//!
//! The child inherits the process environment, so it sees every variable a
//! successful run has merged.

use crate::error::{Result, SetenvError};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Execute a command with inherited stdio and environment.
pub fn execute_command(binary: &Path, args: &[String]) -> Result<ExitStatus> {
	let mut cmd = Command::new(binary);
	cmd.args(args)
		.stdin(Stdio::inherit())
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit());

	cmd.status().map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			SetenvError::CommandNotFound {
				command: binary.to_string_lossy().to_string(),
			}
		} else {
			SetenvError::CommandFailed {
				command: binary.to_string_lossy().to_string(),
				source,
			}
		}
	})
}

/// Resolve a command name to a path.
///
/// Names containing a path separator are taken as given. Bare names are
/// searched on `PATH`, which at this point includes any `PATH` merged from
/// the dotenv file.
pub fn resolve_command(command: &str) -> Option<PathBuf> {
	let path = Path::new(command);

	if path.components().count() > 1 || path.is_absolute() {
		return path.exists().then(|| path.to_path_buf());
	}

	let path_var = std::env::var_os("PATH")?;
	std::env::split_paths(&path_var)
		.map(|dir| dir.join(command))
		.find(|candidate| candidate.is_file())
}
