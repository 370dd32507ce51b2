use crate::error::Result;
use crate::mapping::EnvMapping;
use crate::transform::Transform;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

/// `\$NAME`, `$NAME` or `${NAME}`. Group 1 marks an escaped dollar.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(\\)?\$(?:\{([A-Za-z0-9_]+)\}|([A-Za-z0-9_]+))")
		.expect("reference pattern is valid")
});

/// Replaces `${VAR}` and `$VAR` references with the values they name.
///
/// A reference resolves against the mapping being transformed first, then
/// against the environment captured when the transform was built. Mapping
/// values are expanded transitively; environment values are used as is.
/// Unknown references, and references that would loop back onto a variable
/// currently being expanded, are left as written.
#[derive(Debug, Clone, Default)]
pub struct ExpandTransform {
	environment: HashMap<String, String>,
}

impl ExpandTransform {
	pub fn new(environment: HashMap<String, String>) -> Self {
		Self { environment }
	}

	fn expand_value(&self, value: &str, mapping: &EnvMapping, stack: &mut Vec<String>) -> String {
		REFERENCE
			.replace_all(value, |caps: &Captures| {
				if caps.get(1).is_some() {
					return caps[0][1..].to_string();
				}
				let name = caps
					.get(2)
					.or_else(|| caps.get(3))
					.map_or("", |m| m.as_str());
				self.lookup(name, mapping, stack)
					.unwrap_or_else(|| caps[0].to_string())
			})
			.into_owned()
	}

	fn lookup(&self, name: &str, mapping: &EnvMapping, stack: &mut Vec<String>) -> Option<String> {
		// A variable that refers to itself, directly or through others, can
		// still pick up the inherited value, e.g. PATH=${PATH}:/opt/bin.
		if stack.iter().any(|active| active == name) {
			return self.environment.get(name).cloned();
		}

		match mapping.get(name) {
			Some(raw) => {
				stack.push(name.to_string());
				let expanded = self.expand_value(raw, mapping, stack);
				stack.pop();
				Some(expanded)
			}
			None => self.environment.get(name).cloned(),
		}
	}
}

impl Transform for ExpandTransform {
	fn name(&self) -> &'static str {
		"expand"
	}

	fn transform(&self, mapping: &EnvMapping) -> Result<EnvMapping> {
		let mut expanded = EnvMapping::new();
		for (name, value) in mapping.iter() {
			let mut stack = vec![name.to_string()];
			let value = self.expand_value(value, mapping, &mut stack);
			expanded.insert(name, value);
		}
		Ok(expanded)
	}
}
