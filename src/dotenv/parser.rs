use crate::mapping::EnvMapping;
use regex::Regex;
use std::sync::LazyLock;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*(?:export\s+)?([A-Za-z0-9_.\-]+)\s*=(.*)$")
		.expect("assignment pattern is valid")
});

/// Parse dotenv text into an ordered mapping.
///
/// Values are returned as written apart from quote removal: no `${VAR}`
/// expansion and no shell evaluation. Backtick-wrapped values keep their
/// backticks. Errors carry a line number but never the line content, which
/// may hold secrets.
pub fn parse_dotenv_str(content: &str) -> Result<EnvMapping, String> {
	let mut mapping = EnvMapping::new();
	let mut lines = content.lines().enumerate();

	while let Some((index, line)) = lines.next() {
		let trimmed = line.trim();
		if trimmed.is_empty() || trimmed.starts_with('#') {
			continue;
		}

		let captures = ASSIGNMENT
			.captures(line)
			.ok_or_else(|| format!("Invalid syntax on line {}", index + 1))?;
		let key = captures[1].to_string();
		let raw = captures[2].trim();

		let value = match raw.chars().next() {
			Some(quote @ ('"' | '\'')) => {
				let mut body = raw[1..].to_string();
				let mut closing_line = index;
				loop {
					if let Some(end) = closing_quote(&body, quote) {
						if !is_trailing_comment(&body[end + 1..]) {
							return Err(format!("Invalid syntax on line {}", closing_line + 1));
						}
						break unquote(&body[..end], quote);
					}
					match lines.next() {
						Some((next_index, next)) => {
							closing_line = next_index;
							body.push('\n');
							body.push_str(next);
						}
						None => {
							return Err(format!(
								"Unterminated quoted value for {key} starting on line {}",
								index + 1
							));
						}
					}
				}
			}
			Some('`') => match raw[1..].find('`') {
				Some(end) if is_trailing_comment(&raw[end + 2..]) => raw[..end + 2].to_string(),
				Some(_) => return Err(format!("Invalid syntax on line {}", index + 1)),
				None => raw.to_string(),
			},
			_ => strip_inline_comment(raw).to_string(),
		};

		mapping.insert(key, value);
	}

	Ok(mapping)
}

/// Byte index of the first unescaped `quote` in `body`.
fn closing_quote(body: &str, quote: char) -> Option<usize> {
	let mut escaped = false;
	for (index, c) in body.char_indices() {
		if escaped {
			escaped = false;
		} else if c == '\\' && quote == '"' {
			escaped = true;
		} else if c == quote {
			return Some(index);
		}
	}
	None
}

fn unquote(inner: &str, quote: char) -> String {
	if quote == '"' {
		inner.replace("\\n", "\n").replace("\\\"", "\"")
	} else {
		inner.to_string()
	}
}

/// Whether the text after a closing delimiter is blank or a ` #` comment.
fn is_trailing_comment(rest: &str) -> bool {
	let comment = rest.trim_start();
	comment.is_empty() || (comment.starts_with('#') && comment.len() < rest.len())
}

fn strip_inline_comment(raw: &str) -> &str {
	match raw.find(" #") {
		Some(index) => raw[..index].trim_end(),
		None => raw,
	}
}
