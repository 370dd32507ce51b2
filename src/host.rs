//! Capabilities supplied by the host that embeds setenv.
//!
//! The pipeline never talks to a concrete host. It logs through a [`Logger`],
//! reports failures through an [`ErrorFactory`] and checks for files through a
//! [`FileSystemProbe`]. [`DefaultHost`] wires the ordinary implementations.

use crate::error::SetenvError;
use std::path::Path;

/// Prefix carried by every log line and reported error.
pub const LOG_PREFIX: &str = "setenv: ";

/// Sink for human-readable progress messages.
pub trait Logger {
	fn log(&self, msg: &str);
}

/// Builds the error type the host expects from a prefixed message.
pub trait ErrorFactory {
	type Error;

	fn new_error(&self, message: String, kind: SetenvError) -> Self::Error;
}

/// Answers whether a path exists.
pub trait FileSystemProbe {
	fn exists(&self, path: &Path) -> bool;
}

/// Everything the orchestrator needs from its host.
pub trait Host: Logger + ErrorFactory + FileSystemProbe {}

impl<T: Logger + ErrorFactory + FileSystemProbe> Host for T {}

/// Emits each message as a `tracing` info event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
	fn log(&self, msg: &str) {
		tracing::info!(target: "setenv", "{LOG_PREFIX}{msg}");
	}
}

/// Checks the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystemProbe for StdFileSystem {
	fn exists(&self, path: &Path) -> bool {
		path.is_file()
	}
}

/// The error a run reports to its host.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ReportedError {
	/// Full message, including the `setenv: ` prefix.
	pub message: String,

	#[source]
	pub kind: SetenvError,
}

/// Produces [`ReportedError`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportedErrorFactory;

impl ErrorFactory for ReportedErrorFactory {
	type Error = ReportedError;

	fn new_error(&self, message: String, kind: SetenvError) -> ReportedError {
		ReportedError { message, kind }
	}
}

/// Host built from the default capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHost {
	logger: TracingLogger,
	errors: ReportedErrorFactory,
	fs: StdFileSystem,
}

impl DefaultHost {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Logger for DefaultHost {
	fn log(&self, msg: &str) {
		self.logger.log(msg);
	}
}

impl ErrorFactory for DefaultHost {
	type Error = ReportedError;

	fn new_error(&self, message: String, kind: SetenvError) -> ReportedError {
		self.errors.new_error(message, kind)
	}
}

impl FileSystemProbe for DefaultHost {
	fn exists(&self, path: &Path) -> bool {
		self.fs.exists(path)
	}
}
