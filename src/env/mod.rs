//! The process environment and the merge step that writes to it.
//!
//! [`ProcessEnvironment`] is the single store a run may mutate. Only
//! [`merge`] writes to it, and only after resolution, loading and the
//! transforms have succeeded.

pub mod merger;

pub use merger::merge;

use std::collections::HashMap;

/// Key/value store the merged variables are written to.
pub trait ProcessEnvironment {
	/// Current value of a variable, if set and valid UTF-8.
	fn get(&self, name: &str) -> Option<String>;

	/// Every variable currently set.
	fn snapshot(&self) -> HashMap<String, String>;

	/// Check whether a pair could be written, without writing it.
	fn check(&self, name: &str, value: &str) -> Result<(), String>;

	/// Overwrite a variable.
	fn set(&mut self, name: &str, value: &str) -> Result<(), String>;
}

/// The real environment of the current process.
///
/// Writes go through `std::env::set_var`, which is only sound while no other
/// thread reads or writes the environment. A run is synchronous and
/// single-threaded, so callers must not share the process environment with
/// concurrent runs.
#[derive(Debug, Default)]
pub struct OsEnvironment;

impl OsEnvironment {
	pub fn new() -> Self {
		Self
	}
}

impl ProcessEnvironment for OsEnvironment {
	fn get(&self, name: &str) -> Option<String> {
		std::env::var(name).ok()
	}

	fn snapshot(&self) -> HashMap<String, String> {
		std::env::vars_os()
			.filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
			.collect()
	}

	fn check(&self, name: &str, value: &str) -> Result<(), String> {
		if name.is_empty() {
			return Err("variable name is empty".to_string());
		}
		if name.contains('=') {
			return Err("variable name contains '='".to_string());
		}
		if name.contains('\0') {
			return Err("variable name contains a NUL byte".to_string());
		}
		if value.contains('\0') {
			return Err("value contains a NUL byte".to_string());
		}
		Ok(())
	}

	fn set(&mut self, name: &str, value: &str) -> Result<(), String> {
		self.check(name, value)?;
		// SAFETY: setenv runs synchronously on one thread; the caller owns the
		// process environment for the duration of the run.
		unsafe {
			std::env::set_var(name, value);
		}
		Ok(())
	}
}

/// In-memory environment, for tests and for hosts that collect variables
/// instead of exporting them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnvironment {
	vars: HashMap<String, String>,
}

impl MemoryEnvironment {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed a variable directly.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.vars.insert(name.into(), value.into());
	}

	pub fn vars(&self) -> &HashMap<String, String> {
		&self.vars
	}
}

impl ProcessEnvironment for MemoryEnvironment {
	fn get(&self, name: &str) -> Option<String> {
		self.vars.get(name).cloned()
	}

	fn snapshot(&self) -> HashMap<String, String> {
		self.vars.clone()
	}

	fn check(&self, name: &str, _value: &str) -> Result<(), String> {
		if name.is_empty() {
			return Err("variable name is empty".to_string());
		}
		Ok(())
	}

	fn set(&mut self, name: &str, value: &str) -> Result<(), String> {
		self.check(name, value)?;
		self.vars.insert(name.to_string(), value.to_string());
		Ok(())
	}
}
