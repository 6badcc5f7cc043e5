use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier Doxygen assigns to every documented element.
///
/// Refids are namespaced: `_` is an escape character (`__` is a literal
/// underscore) and `_1` stands for `:`, separating the refid of the compound
/// that defines a member from the member's own id, e.g.
/// `structures_8h_1a4b0c...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RefId(String);

impl RefId {
	/// Wrap a raw refid string.
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	/// The raw refid.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Byte offset of the last unescaped `_1` separator.
	fn separator(&self) -> Option<usize> {
		let bytes = self.0.as_bytes();
		let mut last = None;
		let mut i = 0;
		while i + 1 < bytes.len() {
			if bytes[i] == b'_' {
				if bytes[i + 1] == b'1' {
					last = Some(i);
				}
				i += 2;
			} else {
				i += 1;
			}
		}
		last
	}

	/// Refid of the compound this id is namespaced under, if any.
	pub fn compound_prefix(&self) -> Option<RefId> {
		self.separator()
			.filter(|&at| at > 0)
			.map(|at| RefId(self.0[..at].to_string()))
	}
}

impl fmt::Display for RefId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for RefId {
	fn from(raw: &str) -> Self {
		Self::new(raw)
	}
}

impl From<String> for RefId {
	fn from(raw: String) -> Self {
		Self(raw)
	}
}

impl Borrow<str> for RefId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for RefId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
