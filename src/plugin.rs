//! The end-to-end run: resolve, load, transform, merge.

use crate::config::Configuration;
use crate::dotenv::load_env_file;
use crate::env::{ProcessEnvironment, merge};
use crate::error::Result;
use crate::host::{Host, LOG_PREFIX};
use crate::mapping::EnvMapping;
use crate::resolve::{StageEnvPath, resolve_env_path};
use crate::transform::{ExpandTransform, ShellTransform, TransformPipeline};
use std::path::{Component, Path, PathBuf};

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
	pub path: StageEnvPath,
	pub stage: String,
	/// The variables written to the environment, in file order.
	pub mapping: EnvMapping,
}

/// Run the whole pipeline once.
///
/// Nothing is written to `env` unless resolution, loading and the transforms
/// all succeed. Any failure is reported once through the host's
/// [`ErrorFactory`](crate::host::ErrorFactory), prefixed with `setenv: `.
pub fn run<H: Host>(
	host: &H,
	config: &Configuration,
	env: &mut dyn ProcessEnvironment,
) -> std::result::Result<RunReport, H::Error> {
	execute(host, config, env).map_err(|kind| host.new_error(format!("{LOG_PREFIX}{kind}"), kind))
}

fn execute<H: Host>(host: &H, config: &Configuration, env: &mut dyn ProcessEnvironment) -> Result<RunReport> {
	let path = resolve_env_path(config.dir_path.as_deref(), &config.stage, host)?;
	let parsed = load_env_file(&path.path)?;
	host.log(&format!("Loaded dotenv from \"{}\"", relative_display(&path.path)));

	let snapshot = env.snapshot();
	let pipeline = TransformPipeline::new(
		Box::new(ExpandTransform::new(snapshot.clone())),
		Box::new(ShellTransform::new(snapshot)),
	);
	let mapping = pipeline.apply(&parsed, config.shell, config.expand, config.order.as_deref())?;

	merge(&mapping, env, host, config.debug)?;

	Ok(RunReport {
		path,
		stage: config.stage.clone(),
		mapping,
	})
}

/// `path` relative to the current directory, or as given when there is none.
fn relative_display(path: &Path) -> String {
	match std::env::current_dir() {
		Ok(cwd) => relative_to(path, &cwd).display().to_string(),
		Err(_) => path.display().to_string(),
	}
}

/// Lexical relative path from `base` to `path`, using `..` to climb out of
/// `base`. Paths with different roots are returned unchanged.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
	let path = normalize(path);
	let base = normalize(base);
	let target: Vec<Component> = path.components().collect();
	let from: Vec<Component> = base.components().collect();

	let common = target.iter().zip(&from).take_while(|(a, b)| a == b).count();
	if common == 0 {
		return path;
	}

	let mut relative = PathBuf::new();
	for _ in &from[common..] {
		relative.push("..");
	}
	for component in &target[common..] {
		relative.push(component);
	}
	relative
}

/// Drop `.` and fold `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				normalized.pop();
			}
			other => normalized.push(other),
		}
	}
	normalized
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::env::MemoryEnvironment;
	use crate::error::SetenvError;
	use crate::host::{ErrorFactory, FileSystemProbe, Logger, ReportedError, ReportedErrorFactory, StdFileSystem};
	use std::cell::RefCell;

	#[derive(Default)]
	struct TestHost {
		lines: RefCell<Vec<String>>,
	}

	impl Logger for TestHost {
		fn log(&self, msg: &str) {
			self.lines.borrow_mut().push(msg.to_string());
		}
	}

	impl ErrorFactory for TestHost {
		type Error = ReportedError;

		fn new_error(&self, message: String, kind: SetenvError) -> ReportedError {
			ReportedErrorFactory.new_error(message, kind)
		}
	}

	impl FileSystemProbe for TestHost {
		fn exists(&self, path: &Path) -> bool {
			StdFileSystem.exists(path)
		}
	}

	fn fixtures() -> PathBuf {
		Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
	}

	fn config(stage: &str) -> Configuration {
		Configuration {
			dir_path: Some(fixtures()),
			stage: stage.to_string(),
			..Default::default()
		}
	}

	fn order(items: [&str; 2]) -> Option<Vec<String>> {
		Some(items.iter().map(|s| s.to_string()).collect())
	}

	fn env_with_stage(stage: &str) -> MemoryEnvironment {
		let mut env = MemoryEnvironment::new();
		env.insert("STAGE", stage);
		env
	}

	fn assert_vars(env: &MemoryEnvironment, expected: &[(&str, &str)]) {
		let mut actual: Vec<(&str, &str)> = env
			.vars()
			.iter()
			.map(|(k, v)| (k.as_str(), v.as_str()))
			.collect();
		actual.sort();
		let mut expected = expected.to_vec();
		expected.sort();
		assert_eq!(actual, expected);
	}

	#[test]
	fn test_missing_dotenv_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let host = TestHost::default();
		let mut env = MemoryEnvironment::new();
		let config = Configuration {
			dir_path: Some(temp_dir.path().to_path_buf()),
			stage: "dev".to_string(),
			..Default::default()
		};

		let err = run(&host, &config, &mut env).unwrap_err();
		assert_eq!(err.to_string(), "setenv: Could not determine path for .env");
		assert!(env.vars().is_empty());
	}

	#[test]
	fn test_staged_file_without_transforms() {
		let host = TestHost::default();
		let mut env = env_with_stage("test");

		let report = run(&host, &config("test"), &mut env).unwrap();

		assert!(report.path.staged);
		assert!(report.path.path.ends_with(".env.test"));
		assert_vars(&env, &[
			("STAGE", "test"),
			("BASIC", "basic"),
			("EXPAND", "${BASIC}"),
			("SHELL", "`echo basic`"),
			("EXPAND_SHELL", "`echo '${EXPAND}'`"),
		]);
	}

	#[test]
	fn test_base_file_when_stage_file_missing() {
		let host = TestHost::default();
		let mut env = MemoryEnvironment::new();

		let report = run(&host, &config("dev"), &mut env).unwrap();

		assert!(!report.path.staged);
		assert!(report.path.path.ends_with(".env"));
		assert_vars(&env, &[
			("BASIC", "basic"),
			("EXPAND", "${BASIC}"),
			("SHELL", "`echo basic`"),
			("EXPAND_SHELL", "`echo '${EXPAND}'`"),
		]);
	}

	#[test]
	fn test_expand_only() {
		let host = TestHost::default();
		let mut env = env_with_stage("test");
		let config = Configuration {
			expand: true,
			..config("test")
		};

		run(&host, &config, &mut env).unwrap();

		assert_vars(&env, &[
			("STAGE", "test"),
			("BASIC", "basic"),
			("EXPAND", "basic"),
			("SHELL", "`echo basic`"),
			("EXPAND_SHELL", "`echo 'basic'`"),
		]);
	}

	#[test]
	#[cfg(unix)]
	fn test_shell_only() {
		let host = TestHost::default();
		let mut env = env_with_stage("test");
		let config = Configuration {
			shell: true,
			..config("test")
		};

		run(&host, &config, &mut env).unwrap();

		assert_vars(&env, &[
			("STAGE", "test"),
			("BASIC", "basic"),
			("EXPAND", "${BASIC}"),
			("SHELL", "basic"),
			("EXPAND_SHELL", "${EXPAND}"),
		]);
	}

	#[test]
	fn test_both_without_order_writes_nothing() {
		let host = TestHost::default();
		let mut env = env_with_stage("test");
		let config = Configuration {
			shell: true,
			expand: true,
			..config("test")
		};

		let err = run(&host, &config, &mut env).unwrap_err();

		assert_eq!(err.to_string(), "setenv: custom.setenv.dotenv.order must be an array");
		assert!(matches!(err.kind, SetenvError::InvalidOrder { .. }));
		assert_vars(&env, &[("STAGE", "test")]);
	}

	#[test]
	#[cfg(unix)]
	fn test_both_orders_with_dependencies() {
		for items in [["expand", "shell"], ["shell", "expand"]] {
			let host = TestHost::default();
			let mut env = env_with_stage("dep");
			let config = Configuration {
				shell: true,
				expand: true,
				order: order(items),
				..config("dep")
			};

			run(&host, &config, &mut env).unwrap();

			assert_vars(&env, &[
				("STAGE", "dep"),
				("BASIC", "basic"),
				("EXPAND", "basic"),
				("SHELL", "basic"),
				("EXPAND_SHELL", "basic"),
				("SHELL_DEP1", "shell1"),
				("SHELL_DEP1A", "shell1"),
			]);
		}
	}

	#[test]
	#[cfg(unix)]
	fn test_orders_diverge_on_partial_command() {
		let host = TestHost::default();

		let mut expand_first = MemoryEnvironment::new();
		let config_expand_first = Configuration {
			shell: true,
			expand: true,
			order: order(["expand", "shell"]),
			..config("diverge")
		};
		run(&host, &config_expand_first, &mut expand_first).unwrap();

		let mut shell_first = MemoryEnvironment::new();
		let config_shell_first = Configuration {
			order: order(["shell", "expand"]),
			..config_expand_first.clone()
		};
		run(&host, &config_shell_first, &mut shell_first).unwrap();

		assert_eq!(expand_first.get("REF").as_deref(), Some("prefix-`echo one`"));
		assert_eq!(shell_first.get("REF").as_deref(), Some("prefix-one"));
	}

	#[test]
	fn test_file_value_overwrites_existing() {
		let host = TestHost::default();
		let mut env = MemoryEnvironment::new();
		env.insert("BASIC", "pre-existing");

		run(&host, &config("dev"), &mut env).unwrap();

		assert_eq!(env.get("BASIC").as_deref(), Some("basic"));
	}

	#[test]
	fn test_logs_load_and_each_variable() {
		let host = TestHost::default();
		let mut env = MemoryEnvironment::new();

		run(&host, &config("dev"), &mut env).unwrap();

		let lines = host.lines.borrow();
		assert!(lines[0].starts_with("Loaded dotenv from \""));
		assert!(lines[0].ends_with(".env\""));
		assert_eq!(
			&lines[1..],
			&["Set BASIC", "Set EXPAND", "Set SHELL", "Set EXPAND_SHELL"]
		);
	}

	#[test]
	fn test_debug_logs_values() {
		let host = TestHost::default();
		let mut env = MemoryEnvironment::new();
		let config = Configuration {
			debug: true,
			..config("dev")
		};

		run(&host, &config, &mut env).unwrap();

		assert!(host.lines.borrow().contains(&"Set BASIC = basic".to_string()));
	}

	#[test]
	fn test_parse_error_is_prefixed() {
		let temp_dir = tempfile::tempdir().unwrap();
		std::fs::write(temp_dir.path().join(".env"), "GOOD=1\nnot valid\n").unwrap();
		let host = TestHost::default();
		let mut env = MemoryEnvironment::new();
		let config = Configuration {
			dir_path: Some(temp_dir.path().to_path_buf()),
			stage: "dev".to_string(),
			..Default::default()
		};

		let err = run(&host, &config, &mut env).unwrap_err();

		assert_eq!(err.to_string(), "setenv: Invalid syntax on line 2");
		assert!(env.vars().is_empty());
	}

	#[test]
	fn test_text_after_closing_delimiter_fails_the_run() {
		for (content, line) in [("CMD=`echo a` `echo b`\n", 1), ("OK=1\nQ='it''s'\n", 2)] {
			let temp_dir = tempfile::tempdir().unwrap();
			std::fs::write(temp_dir.path().join(".env"), content).unwrap();
			let host = TestHost::default();
			let mut env = MemoryEnvironment::new();
			let config = Configuration {
				dir_path: Some(temp_dir.path().to_path_buf()),
				stage: "dev".to_string(),
				shell: true,
				..Default::default()
			};

			let err = run(&host, &config, &mut env).unwrap_err();

			assert_eq!(err.to_string(), format!("setenv: Invalid syntax on line {line}"));
			assert!(matches!(err.kind, SetenvError::ParseError { .. }));
			assert!(env.vars().is_empty());
		}
	}

	#[test]
	fn test_relative_to_below_base() {
		assert_eq!(
			relative_to(Path::new("/srv/app/config/.env"), Path::new("/srv/app")),
			PathBuf::from("config/.env")
		);
	}

	#[test]
	fn test_relative_to_climbs_out_of_base() {
		assert_eq!(
			relative_to(Path::new("/srv/shared/.env"), Path::new("/srv/app")),
			PathBuf::from("../shared/.env")
		);
		assert_eq!(
			relative_to(Path::new("/srv/app/../shared/./.env"), Path::new("/srv/app")),
			PathBuf::from("../shared/.env")
		);
		assert_eq!(
			relative_to(Path::new("/other/.env"), Path::new("/srv/app/nested")),
			PathBuf::from("../../../other/.env")
		);
	}
}
