/// Ordered mapping of variable names to values.
///
/// Keys are unique. Insertion order is kept so that logging and merging
/// follow the order of the source file. Inserting a key that is already
/// present replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMapping {
	entries: Vec<(String, String)>,
}

impl EnvMapping {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace a value. Returns the previous value, if any.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		let name = name.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(key, _)| *key == name) {
			Some((_, existing)) => Some(std::mem::replace(existing, value)),
			None => {
				self.entries.push((name, value));
				None
			}
		}
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	pub fn contains_key(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.iter()
			.map(|(key, value)| (key.as_str(), value.as_str()))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(key, _)| key.as_str())
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMapping {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut mapping = EnvMapping::new();
		for (key, value) in iter {
			mapping.insert(key, value);
		}
		mapping
	}
}

impl IntoIterator for EnvMapping {
	type Item = (String, String);
	type IntoIter = std::vec::IntoIter<(String, String)>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_insert_keeps_first_position() {
		let mut mapping = EnvMapping::new();
		mapping.insert("A", "1");
		mapping.insert("B", "2");
		let previous = mapping.insert("A", "3");

		assert_eq!(previous, Some("1".to_string()));
		assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["A", "B"]);
		assert_eq!(mapping.get("A"), Some("3"));
	}

	#[test]
	fn test_from_iter_preserves_order() {
		let mapping: EnvMapping = [("Z", "last"), ("A", "first")].into_iter().collect();
		assert_eq!(
			mapping.iter().collect::<Vec<_>>(),
			vec![("Z", "last"), ("A", "first")]
		);
		assert_eq!(mapping.len(), 2);
		assert!(!mapping.contains_key("M"));
	}
}
