use crate::config::types::HostOptions;
use crate::env::ProcessEnvironment;

/// Stage used when no signal is set.
pub const DEFAULT_STAGE: &str = "dev";

/// Environment variables that turn on value logging.
pub const DEBUG_VARS: [&str; 2] = ["SETENV_DEBUG", "SLS_DEBUG"];

/// Every input that can name the deployment stage, plus the debug flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSignals {
	pub node_env: Option<String>,
	pub stage_upper: Option<String>,
	pub stage_lower: Option<String>,
	pub option_stage: Option<String>,
	pub option_env: Option<String>,
	pub debug: bool,
}

impl StageSignals {
	/// Read the signals from an environment and the caller's options.
	pub fn collect(env: &dyn ProcessEnvironment, options: &HostOptions) -> Self {
		Self {
			node_env: env.get("NODE_ENV"),
			stage_upper: env.get("STAGE"),
			stage_lower: env.get("stage"),
			option_stage: options.stage.clone(),
			option_env: options.env.clone(),
			debug: options.debug || DEBUG_VARS.iter().any(|var| is_truthy(env.get(var))),
		}
	}

	/// The first non-empty signal in precedence order, else `dev`.
	pub fn resolve_stage(&self) -> String {
		[
			&self.node_env,
			&self.stage_upper,
			&self.stage_lower,
			&self.option_stage,
			&self.option_env,
		]
		.into_iter()
		.flatten()
		.find(|value| !value.is_empty())
		.cloned()
		.unwrap_or_else(|| DEFAULT_STAGE.to_string())
	}
}

/// Check if an environment value is truthy.
fn is_truthy(value: Option<String>) -> bool {
	match value {
		Some(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		None => false,
	}
}
