//! Optional transforms applied to a parsed mapping.
//!
//! This module handles:
//! - `${VAR}` expansion ([`ExpandTransform`])
//! - Backtick shell substitution ([`ShellTransform`])
//! - Sequencing both in the caller's [`TransformOrder`]

pub mod expand;
pub mod order;
pub mod shell;

pub use expand::ExpandTransform;
pub use order::TransformOrder;
pub use shell::{ShellTransform, shell_command};

use crate::error::Result;
use crate::mapping::EnvMapping;

/// A mapping-to-mapping rewrite. Implementations never modify their input.
pub trait Transform {
	/// Short name used in log output.
	fn name(&self) -> &'static str;

	fn transform(&self, mapping: &EnvMapping) -> Result<EnvMapping>;
}

/// Applies the enabled transforms in the requested order.
pub struct TransformPipeline {
	expand: Box<dyn Transform>,
	shell: Box<dyn Transform>,
}

impl TransformPipeline {
	pub fn new(expand: Box<dyn Transform>, shell: Box<dyn Transform>) -> Self {
		Self { expand, shell }
	}

	/// Apply zero, one, or both transforms.
	///
	/// `order` is only consulted, and then required, when both `shell` and
	/// `expand` are set.
	pub fn apply(
		&self,
		mapping: &EnvMapping,
		shell: bool,
		expand: bool,
		order: Option<&[String]>,
	) -> Result<EnvMapping> {
		let stages: Vec<&dyn Transform> = match (shell, expand) {
			(false, false) => Vec::new(),
			(true, false) => vec![self.shell.as_ref()],
			(false, true) => vec![self.expand.as_ref()],
			(true, true) => match TransformOrder::parse(order)? {
				TransformOrder::ShellThenExpand => vec![self.shell.as_ref(), self.expand.as_ref()],
				TransformOrder::ExpandThenShell => vec![self.expand.as_ref(), self.shell.as_ref()],
			},
		};

		let mut current = mapping.clone();
		for stage in stages {
			tracing::debug!(transform = stage.name(), vars = current.len(), "applying transform");
			current = stage.transform(&current)?;
		}
		Ok(current)
	}
}
