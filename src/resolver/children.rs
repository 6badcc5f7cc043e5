//! Child enumeration policy.

use bitflags::bitflags;

use crate::model::{Kind, RefId, Relation, RelationSet};

/// Default breadth bound of one `children_of` call.
pub const DEFAULT_CHILDREN_LIMIT: usize = 10_000;

bitflags! {
	/// Rendering options a caller hands down to every child it expands.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
	pub struct RenderFlags: u8 {
		/// Do not add the child to the destination's index.
		const NOINDEX = 1 << 0;
		/// Hide the declaring location.
		const HIDELOC = 1 << 1;
		/// Hide the declaration itself.
		const HIDEDEF = 1 << 2;
		/// Hide the documentation text.
		const HIDEDOC = 1 << 3;
	}
}

impl RenderFlags {
	/// Parse a flag by name, as typed in directive options.
	pub fn from_option(name: &str) -> Option<Self> {
		match name.trim().to_ascii_lowercase().as_str() {
			"noindex" => Some(Self::NOINDEX),
			"hideloc" => Some(Self::HIDELOC),
			"hidedef" => Some(Self::HIDEDEF),
			"hidedoc" => Some(Self::HIDEDOC),
			_ => None,
		}
	}
}

/// Which children a policy keeps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChildSelection {
	/// Every child whose kind differs from the parent's kind.
	#[default]
	OtherKinds,
	/// Every child.
	All,
	/// Only the named children, in the order given.
	Include(Vec<String>),
	/// Every child except the named ones.
	Exclude(Vec<String>),
}

/// Caller-supplied rules for `children_of`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildPolicy {
	/// Relations to traverse.
	pub relations: RelationSet,
	/// Name or kind based selection.
	pub selection: ChildSelection,
	/// Options inherited by every selected child.
	pub options: RenderFlags,
	/// Maximum number of children returned.
	pub limit: usize,
}

impl Default for ChildPolicy {
	fn default() -> Self {
		Self {
			relations: RelationSet::all(),
			selection: ChildSelection::default(),
			options: RenderFlags::empty(),
			limit: DEFAULT_CHILDREN_LIMIT,
		}
	}
}

impl ChildPolicy {
	/// Policy traversing only `relations`.
	pub fn new(relations: RelationSet) -> Self {
		Self {
			relations,
			..Self::default()
		}
	}

	/// Replace the selection.
	pub fn with_selection(mut self, selection: ChildSelection) -> Self {
		self.selection = selection;
		self
	}

	/// Replace the inherited options.
	pub fn with_options(mut self, options: RenderFlags) -> Self {
		self.options = options;
		self
	}

	/// Replace the breadth bound.
	pub fn with_limit(mut self, limit: usize) -> Self {
		self.limit = limit;
		self
	}
}

/// One entry of a `children_of` result.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Child {
	/// Refid of the child.
	pub refid: RefId,
	/// Kind of the child.
	pub kind: Kind,
	/// Bare name of the child.
	pub name: String,
	/// How the parent contains it.
	pub relation: Relation,
	/// Options inherited from the caller.
	pub options: RenderFlags,
}
