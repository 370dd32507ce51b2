use crate::env::ProcessEnvironment;
use crate::error::{Result, SetenvError};
use crate::host::Logger;
use crate::mapping::EnvMapping;

/// Write every variable of `mapping` into `env`, in order.
///
/// All pairs are checked before the first write, so a rejected pair leaves
/// the environment untouched. Each write logs `Set <name>`, or
/// `Set <name> = <value>` when `debug` is on.
pub fn merge(
	mapping: &EnvMapping,
	env: &mut dyn ProcessEnvironment,
	logger: &dyn Logger,
	debug: bool,
) -> Result<()> {
	for (name, value) in mapping.iter() {
		env.check(name, value).map_err(|message| SetenvError::MergeError {
			name: name.to_string(),
			message,
		})?;
	}

	for (name, value) in mapping.iter() {
		env.set(name, value).map_err(|message| SetenvError::MergeError {
			name: name.to_string(),
			message,
		})?;

		if debug {
			logger.log(&format!("Set {name} = {value}"));
		} else {
			logger.log(&format!("Set {name}"));
		}
	}

	Ok(())
}
