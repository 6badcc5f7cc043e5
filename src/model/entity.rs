use bitflags::bitflags;

use super::{Kind, RefId};

/// Source position recorded by Doxygen's `<location>` element.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Location {
	/// Normalized path of the declaring file.
	pub file: String,
	/// One-indexed declaration line, when known.
	pub line: Option<u32>,
}

impl Location {
	/// Format as `path:line` (or just `path`).
	pub fn to_compact_string(&self) -> String {
		match self.line {
			Some(line) => format!("{}:{}", self.file, line),
			None => self.file.clone(),
		}
	}
}

/// One documented construct.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Entity {
	/// Primary key.
	pub refid: RefId,
	/// Structural kind.
	pub kind: Kind,
	/// Declared identifier, without any `Outer::` scope.
	pub name: String,
	/// Human title of groups and pages.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub title: Option<String>,
	/// Declaring file and line. `None` for groups, pages and dirs.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub location: Option<Location>,
	/// Canonical containing compound. A lookup key, never ownership.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub parent: Option<RefId>,
}

impl Entity {
	/// Normalized path of the declaring file.
	pub fn file_path(&self) -> Option<&str> {
		self.location.as_ref().map(|loc| loc.file.as_str())
	}
}

/// How a child is contained in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
	/// A file declares the child.
	FileMember,
	/// A group documents the child.
	GroupMember,
	/// A struct, union, class or enum has the child as field or value.
	Field,
	/// A directory, page or namespace nests the child.
	Nested,
}

impl Relation {
	/// Relation implied by the kind of the containing entity.
	pub fn for_parent(parent: Kind) -> Self {
		match parent {
			Kind::File => Self::FileMember,
			Kind::Group => Self::GroupMember,
			kind if kind.is_scope() => Self::Field,
			_ => Self::Nested,
		}
	}

	/// Flag form of this relation.
	pub fn as_set(self) -> RelationSet {
		match self {
			Self::FileMember => RelationSet::FILE,
			Self::GroupMember => RelationSet::GROUP,
			Self::Field => RelationSet::FIELD,
			Self::Nested => RelationSet::NESTED,
		}
	}

	/// Short label.
	pub fn label(self) -> &'static str {
		match self {
			Self::FileMember => "file",
			Self::GroupMember => "group",
			Self::Field => "field",
			Self::Nested => "nested",
		}
	}
}

bitflags! {
	/// Relations a query is interested in.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct RelationSet: u8 {
		/// File declares member.
		const FILE = 1 << 0;
		/// Group documents member.
		const GROUP = 1 << 1;
		/// Struct has field, enum has value.
		const FIELD = 1 << 2;
		/// Directory, page or namespace nesting.
		const NESTED = 1 << 3;
	}
}

impl Default for RelationSet {
	fn default() -> Self {
		Self::all()
	}
}

impl RelationSet {
	/// Whether `relation` is part of the set.
	pub fn includes(self, relation: Relation) -> bool {
		self.contains(relation.as_set())
	}
}

/// Containment edge between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
	/// Containing entity.
	pub parent: RefId,
	/// Contained entity.
	pub child: RefId,
	/// Kind of containment.
	pub relation: Relation,
}
