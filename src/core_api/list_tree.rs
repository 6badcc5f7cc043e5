//! Hierarchical tree structure for containment output.

use std::collections::HashSet;

use crate::index::EntityIndex;
use crate::model::{Kind, RefId, Relation, RelationSet};

/// A hierarchical tree node representing an entity and its children.
/// This provides a nested structure that reduces verbosity in JSON output.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EntityTreeNode {
	/// Refid of the entity.
	pub refid: RefId,
	/// Bare name of the entity.
	pub name: String,
	/// Kind classification for the entity.
	pub kind: Kind,
	/// How the parent node contains this one; `None` at the root.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub relation: Option<Relation>,
	/// Source location if available (format: "path/to/file.h:line").
	#[serde(skip_serializing_if = "Option::is_none", rename = "src", default)]
	pub source: Option<String>,
	/// Child entities nested under this one.
	#[serde(skip_serializing_if = "Vec::is_empty", default)]
	pub children: Vec<EntityTreeNode>,
}

impl EntityTreeNode {
	/// Number of nodes in this subtree, the root included.
	pub fn size(&self) -> usize {
		1 + self.children.iter().map(Self::size).sum::<usize>()
	}
}

/// Walk containment edges of `relations` from `root`, at most `max_depth`
/// levels deep.
///
/// An entity already on the current branch is not expanded again, so
/// containment cycles terminate. Members are listed before compounds.
pub fn build_entity_tree(
	index: &EntityIndex,
	root: &RefId,
	relations: RelationSet,
	max_depth: usize,
) -> Option<EntityTreeNode> {
	let mut branch = HashSet::new();
	walk(index, root, None, relations, max_depth, &mut branch)
}

fn walk(
	index: &EntityIndex,
	refid: &RefId,
	relation: Option<Relation>,
	relations: RelationSet,
	depth_left: usize,
	branch: &mut HashSet<RefId>,
) -> Option<EntityTreeNode> {
	let entity = index.get(refid)?;
	let mut node = EntityTreeNode {
		refid: refid.clone(),
		name: entity.name.clone(),
		kind: entity.kind,
		relation,
		source: entity.location.as_ref().map(|loc| loc.to_compact_string()),
		children: Vec::new(),
	};
	if depth_left == 0 || !branch.insert(refid.clone()) {
		return Some(node);
	}

	let links = index
		.children(refid)
		.iter()
		.filter(|link| relations.includes(link.relation));
	for link in links {
		if branch.contains(&link.refid) {
			continue;
		}
		if let Some(child) = walk(index, &link.refid, Some(link.relation), relations, depth_left - 1, branch) {
			node.children.push(child);
		}
	}
	node.children.sort_by_key(|child| child.kind.is_compound());
	branch.remove(refid);
	Some(node)
}
