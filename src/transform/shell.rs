use crate::error::{Result, SetenvError};
use crate::mapping::EnvMapping;
use crate::transform::Transform;
use std::collections::HashMap;
use std::process::{Command, Stdio};

/// Runs backtick-wrapped values as shell commands.
///
/// Each command runs through `sh -c` and sees, on top of the inherited
/// process environment: the environment captured when the transform was
/// built, every raw value of the mapping, and every value already produced
/// earlier in this pass. The trimmed stdout replaces the value.
#[derive(Debug, Clone, Default)]
pub struct ShellTransform {
	environment: HashMap<String, String>,
}

impl ShellTransform {
	pub fn new(environment: HashMap<String, String>) -> Self {
		Self { environment }
	}

	fn run(&self, name: &str, command: &str, raw: &EnvMapping, resolved: &EnvMapping) -> Result<String> {
		let mut cmd = Command::new("sh");
		cmd.arg("-c")
			.arg(command)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.envs(&self.environment)
			.envs(raw.iter())
			.envs(resolved.iter());

		tracing::debug!(name, command, "running shell substitution");

		let output = cmd.output().map_err(|source| SetenvError::ShellSpawnFailed {
			name: name.to_string(),
			command: command.to_string(),
			source,
		})?;

		if !output.status.success() {
			return Err(SetenvError::ShellCommandFailed {
				name: name.to_string(),
				command: command.to_string(),
				exit_code: output.status.code().unwrap_or(-1),
				stderr: String::from_utf8_lossy(&output.stderr).to_string(),
			});
		}

		Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
	}
}

/// The command inside a backtick-wrapped value, if the value is one.
pub fn shell_command(value: &str) -> Option<&str> {
	let trimmed = value.trim();
	if trimmed.len() >= 2 && trimmed.starts_with('`') && trimmed.ends_with('`') {
		Some(&trimmed[1..trimmed.len() - 1])
	} else {
		None
	}
}

impl Transform for ShellTransform {
	fn name(&self) -> &'static str {
		"shell"
	}

	fn transform(&self, mapping: &EnvMapping) -> Result<EnvMapping> {
		let mut resolved = EnvMapping::new();
		for (name, value) in mapping.iter() {
			let value = match shell_command(value) {
				Some(command) => self.run(name, command, mapping, &resolved)?,
				None => value.to_string(),
			};
			resolved.insert(name, value);
		}
		Ok(resolved)
	}
}
