//! Selection of the `.env` file for a stage.

use crate::error::{Result, SetenvError};
use crate::host::FileSystemProbe;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Base file name inside the dotenv directory.
pub const DOTENV_FILE: &str = ".env";

/// The file chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEnvPath {
	/// Absolute path of the file to load.
	pub path: PathBuf,

	/// Whether the stage-specific file was found, as opposed to the base one.
	pub staged: bool,
}

/// Path of the base `.env` file for an optional directory.
pub fn base_env_path(dir_path: Option<&Path>) -> PathBuf {
	let base = dir_path.unwrap_or(Path::new(".")).join(DOTENV_FILE);
	std::path::absolute(&base).unwrap_or(base)
}

/// Path of the stage-specific file next to `base`: `<base>.<stage>`.
pub fn staged_env_path(base: &Path, stage: &str) -> PathBuf {
	let mut staged = OsString::from(base.as_os_str());
	staged.push(".");
	staged.push(stage);
	PathBuf::from(staged)
}

/// Pick `<base>.<stage>`, falling back to `<base>`.
pub fn resolve_env_path(
	dir_path: Option<&Path>,
	stage: &str,
	probe: &dyn FileSystemProbe,
) -> Result<StageEnvPath> {
	let base = base_env_path(dir_path);
	let staged = staged_env_path(&base, stage);

	if probe.exists(&staged) {
		return Ok(StageEnvPath {
			path: staged,
			staged: true,
		});
	}

	if probe.exists(&base) {
		return Ok(StageEnvPath {
			path: base,
			staged: false,
		});
	}

	Err(SetenvError::PathNotFound {
		candidates: vec![staged, base],
	})
}
