use std::fmt;

/// Combination of Doxygen's compound kinds and member kinds.
///
/// Only the kinds that make sense for C (and the C-like subset of C++) are
/// represented; anything else found in the XML is skipped during indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
	/// C++ class.
	Class,
	/// C struct.
	Struct,
	/// C union.
	Union,
	/// Exception class.
	Exception,
	/// Source or header file.
	File,
	/// C++ namespace.
	Namespace,
	/// Documentation group (module).
	Group,
	/// Free-standing documentation page.
	Page,
	/// Example file.
	Example,
	/// Directory.
	Dir,
	/// Preprocessor macro.
	Define,
	/// Property.
	Property,
	/// Global variable or struct field.
	Variable,
	/// Type alias.
	Typedef,
	/// Enumeration.
	Enum,
	/// Enumerator inside an enumeration.
	EnumValue,
	/// Function or function prototype.
	Function,
	/// Friend declaration.
	Friend,
}

impl Kind {
	/// Every supported kind, in declaration order.
	pub const ALL: [Kind; 18] = [
		Self::Class,
		Self::Struct,
		Self::Union,
		Self::Exception,
		Self::File,
		Self::Namespace,
		Self::Group,
		Self::Page,
		Self::Example,
		Self::Dir,
		Self::Define,
		Self::Property,
		Self::Variable,
		Self::Typedef,
		Self::Enum,
		Self::EnumValue,
		Self::Function,
		Self::Friend,
	];

	/// Name used by the XML `kind` attribute.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Class => "class",
			Self::Struct => "struct",
			Self::Union => "union",
			Self::Exception => "exception",
			Self::File => "file",
			Self::Namespace => "namespace",
			Self::Group => "group",
			Self::Page => "page",
			Self::Example => "example",
			Self::Dir => "dir",
			Self::Define => "define",
			Self::Property => "property",
			Self::Variable => "variable",
			Self::Typedef => "typedef",
			Self::Enum => "enum",
			Self::EnumValue => "enumvalue",
			Self::Function => "function",
			Self::Friend => "friend",
		}
	}

	/// Parse an XML `kind` attribute. Unsupported kinds yield `None`.
	pub fn from_xml(attr: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == attr)
	}

	/// Parse a user-typed kind, as found in `kind[name]` targets.
	///
	/// Matching is case-insensitive and accepts `macro`, `module` and
	/// `enum-value` as aliases.
	pub fn from_user(word: &str) -> Option<Self> {
		let word = word.trim().to_ascii_lowercase();
		match word.as_str() {
			"macro" => Some(Self::Define),
			"module" => Some(Self::Group),
			"enum-value" | "enum_value" => Some(Self::EnumValue),
			other => Self::from_xml(other),
		}
	}

	/// Kinds that have their own compound document.
	pub fn is_compound(self) -> bool {
		matches!(
			self,
			Self::Class
				| Self::Struct
				| Self::Union
				| Self::Exception
				| Self::File
				| Self::Namespace
				| Self::Group
				| Self::Page
				| Self::Dir
		)
	}

	/// Compounds defined by the documentation author rather than by the
	/// language syntax.
	pub fn is_synthetic(self) -> bool {
		matches!(self, Self::Group | Self::Page | Self::Dir)
	}

	/// Kinds that are not proper members but children of a member.
	pub fn is_subordinate(self) -> bool {
		matches!(self, Self::EnumValue)
	}

	/// Kinds whose members are addressed through them (`Outer::member`).
	pub fn is_scope(self) -> bool {
		matches!(
			self,
			Self::Class | Self::Struct | Self::Union | Self::Exception | Self::Enum
		)
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn xml_names_round_trip() {
		for kind in Kind::ALL {
			assert_eq!(Kind::from_xml(kind.as_str()), Some(kind));
		}
		assert_eq!(Kind::from_xml("concept"), None);
		assert_eq!(Kind::from_xml("Struct"), None);
	}

	#[test]
	fn user_aliases() {
		assert_eq!(Kind::from_user("macro"), Some(Kind::Define));
		assert_eq!(Kind::from_user("Module"), Some(Kind::Group));
		assert_eq!(Kind::from_user("STRUCT"), Some(Kind::Struct));
		assert_eq!(Kind::from_user("enum-value"), Some(Kind::EnumValue));
		assert_eq!(Kind::from_user("widget"), None);
	}

	#[test]
	fn classification() {
		assert!(Kind::File.is_compound());
		assert!(!Kind::Function.is_compound());
		assert!(Kind::Group.is_synthetic());
		assert!(!Kind::Struct.is_synthetic());
		assert!(Kind::EnumValue.is_subordinate());
		assert!(Kind::Enum.is_scope());
	}
}
