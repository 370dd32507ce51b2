use crate::error::{OrderProblem, Result, SetenvError};

/// Sequence of the two transforms when both are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOrder {
	ShellThenExpand,
	ExpandThenShell,
}

impl TransformOrder {
	/// Validate a caller-supplied order.
	///
	/// The tokens must join to exactly `shell,expand` or `expand,shell`.
	pub fn parse(order: Option<&[String]>) -> Result<Self> {
		let tokens = order.ok_or(SetenvError::InvalidOrder {
			problem: OrderProblem::NotAnArray,
		})?;

		if tokens.len() != 2 {
			return Err(SetenvError::InvalidOrder {
				problem: OrderProblem::WrongLength(tokens.len()),
			});
		}

		match tokens.join(",").as_str() {
			"shell,expand" => Ok(TransformOrder::ShellThenExpand),
			"expand,shell" => Ok(TransformOrder::ExpandThenShell),
			other => Err(SetenvError::InvalidOrder {
				problem: OrderProblem::InvalidTokens(other.to_string()),
			}),
		}
	}
}
