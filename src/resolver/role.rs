use std::fmt;

/// Rendering role of an entity in the destination document's C domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainRole {
	/// Struct, union, enum or typedef.
	Type,
	/// Preprocessor macro.
	Macro,
	/// Function.
	Function,
	/// Field of a struct or union.
	Member,
	/// Free-standing variable.
	Var,
}

impl DomainRole {
	/// Name of the role.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Type => "type",
			Self::Macro => "macro",
			Self::Function => "function",
			Self::Member => "member",
			Self::Var => "var",
		}
	}
}

impl fmt::Display for DomainRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
