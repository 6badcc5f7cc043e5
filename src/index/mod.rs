//! Relationship and index builder.
//!
//! Consumes the normalized rows and edges once and derives every lookup
//! structure the resolver needs. The result is immutable.

mod paths;

use std::collections::{HashMap, HashSet};

use tracing::debug;

pub use self::paths::{PathForm, PathTable, components};
use crate::model::{Edge, Entity, Kind, RefId, Relation};

/// Longest `Outer::inner` chain followed when qualifying a name.
const MAX_SCOPE_DEPTH: usize = 20;

/// Name under which file compounds are registered in the path table.
pub const FILE_SELF: &str = "*";

/// A containment edge seen from one of its ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
	/// The entity on the other end.
	pub refid: RefId,
	/// Kind of containment.
	pub relation: Relation,
}

/// Order of preference when choosing an entity's canonical parent.
fn parent_rank(relation: Relation) -> u8 {
	match relation {
		Relation::Field => 0,
		Relation::FileMember => 1,
		Relation::Nested => 2,
		Relation::GroupMember => 3,
	}
}

/// Immutable lookup tables over one documentation build.
#[derive(Debug, Default)]
pub struct EntityIndex {
	by_refid: HashMap<RefId, Entity>,
	order: Vec<RefId>,
	qualified: HashMap<RefId, String>,
	by_kind_name: HashMap<(Kind, String), Vec<RefId>>,
	by_name: HashMap<String, Vec<RefId>>,
	paths: PathTable,
	children: HashMap<RefId, Vec<Link>>,
	parents: HashMap<RefId, Vec<Link>>,
	edge_count: usize,
}

impl EntityIndex {
	/// Build the index from normalized rows and containment edges.
	///
	/// Edges naming an unknown refid at either end are dropped.
	pub fn build(entities: Vec<Entity>, edges: Vec<Edge>) -> Self {
		let mut index = Self::default();
		for entity in entities {
			if index.by_refid.contains_key(&entity.refid) {
				debug!(refid = %entity.refid, "duplicate row ignored");
				continue;
			}
			index.order.push(entity.refid.clone());
			index.by_refid.insert(entity.refid.clone(), entity);
		}

		let mut seen = HashSet::new();
		let mut dangling = 0usize;
		for edge in edges {
			if !index.by_refid.contains_key(&edge.parent) || !index.by_refid.contains_key(&edge.child) {
				debug!(parent = %edge.parent, child = %edge.child, "edge to unknown entity dropped");
				dangling += 1;
				continue;
			}
			if edge.parent == edge.child || !seen.insert(edge.clone()) {
				continue;
			}
			index.children.entry(edge.parent.clone()).or_default().push(Link {
				refid: edge.child.clone(),
				relation: edge.relation,
			});
			index.parents.entry(edge.child).or_default().push(Link {
				refid: edge.parent,
				relation: edge.relation,
			});
			index.edge_count += 1;
		}
		if dangling > 0 {
			debug!(dangling, "edges dropped while indexing");
		}

		index.assign_parents();
		index.qualify_names();
		index.fill_name_tables();
		index
	}

	fn assign_parents(&mut self) {
		for refid in &self.order {
			let canonical = self.parents.get(refid).and_then(|links| {
				links
					.iter()
					.enumerate()
					.min_by_key(|(pos, link)| (parent_rank(link.relation), *pos))
					.map(|(_, link)| link.refid.clone())
			});
			if let Some(entity) = self.by_refid.get_mut(refid) {
				entity.parent = canonical;
			}
		}
	}

	/// Prefix every name reached through a field relation with its scope.
	fn qualify_names(&mut self) {
		self.qualified = self
			.order
			.iter()
			.filter_map(|refid| Some((refid.clone(), self.scoped_name(refid)?)))
			.collect();
	}

	fn scoped_name(&self, refid: &RefId) -> Option<String> {
		let mut parts = vec![self.by_refid.get(refid)?.name.as_str()];
		let mut current = refid;
		for _ in 0..MAX_SCOPE_DEPTH {
			let Some(scope) = self.field_scope(current) else {
				break;
			};
			let Some(outer) = self.by_refid.get(scope) else {
				break;
			};
			parts.push(outer.name.as_str());
			current = scope;
		}
		parts.reverse();
		Some(parts.join("::"))
	}

	/// The canonical parent of `refid` when it contains it as a field.
	fn field_scope(&self, refid: &RefId) -> Option<&RefId> {
		let parent = self.by_refid.get(refid)?.parent.as_ref()?;
		self.parents
			.get(refid)?
			.iter()
			.any(|link| &link.refid == parent && link.relation == Relation::Field)
			.then_some(parent)
	}

	fn fill_name_tables(&mut self) {
		let mut path_entries = Vec::new();
		for refid in &self.order {
			let Some(entity) = self.by_refid.get(refid) else {
				continue;
			};
			let qualified = self
				.qualified
				.get(refid)
				.cloned()
				.unwrap_or_else(|| entity.name.clone());

			let mut names = vec![entity.name.clone()];
			if qualified != entity.name {
				names.push(qualified.clone());
			}
			for name in names {
				self.by_kind_name
					.entry((entity.kind, name.clone()))
					.or_default()
					.push(refid.clone());
				self.by_name.entry(name).or_default().push(refid.clone());
			}

			if let Some(path) = entity.file_path().filter(|_| !entity.kind.is_synthetic()) {
				let key = if entity.kind == Kind::File {
					FILE_SELF.to_string()
				} else {
					qualified
				};
				path_entries.push((key, path.to_string(), refid.clone()));
			}
		}

		let by_refid = &self.by_refid;
		let sort = |list: &mut Vec<RefId>| {
			list.sort_by(|a, b| {
				let pa = by_refid.get(a).and_then(Entity::file_path).map(components);
				let pb = by_refid.get(b).and_then(Entity::file_path).map(components);
				pa.cmp(&pb).then_with(|| a.cmp(b))
			});
		};
		self.by_kind_name.values_mut().for_each(sort);
		self.by_name.values_mut().for_each(sort);
		self.paths = PathTable::build(path_entries);
	}

	/// Entity stored under `refid`.
	pub fn get(&self, refid: &RefId) -> Option<&Entity> {
		self.by_refid.get(refid)
	}

	/// Whether `refid` is indexed.
	pub fn contains(&self, refid: &RefId) -> bool {
		self.by_refid.contains_key(refid)
	}

	/// Every entity in first-seen order.
	pub fn entities(&self) -> impl Iterator<Item = &Entity> {
		self.order.iter().filter_map(|refid| self.by_refid.get(refid))
	}

	/// Number of entities.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Whether the index holds no entity.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Number of distinct edges kept.
	pub fn edge_count(&self) -> usize {
		self.edge_count
	}

	/// Number of entities that contain at least one other entity.
	pub fn parent_count(&self) -> usize {
		self.children.len()
	}

	/// Name as written in targets: `Outer::inner` for fields and enum values.
	pub fn qualified_name(&self, refid: &RefId) -> Option<&str> {
		self.qualified.get(refid).map(String::as_str)
	}

	/// Entities of `kind` named `name` (bare or qualified).
	pub fn by_kind_name(&self, kind: Kind, name: &str) -> &[RefId] {
		self.by_kind_name
			.get(&(kind, name.to_string()))
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Entities of any kind named `name` (bare or qualified).
	pub fn by_name(&self, name: &str) -> &[RefId] {
		self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
	}

	/// The path-suffix table.
	pub fn paths(&self) -> &PathTable {
		&self.paths
	}

	/// Direct children of `refid`, in edge insertion order.
	pub fn children(&self, refid: &RefId) -> &[Link] {
		self.children.get(refid).map(Vec::as_slice).unwrap_or_default()
	}

	/// Direct parents of `refid`, in edge insertion order.
	pub fn parents(&self, refid: &RefId) -> &[Link] {
		self.parents.get(refid).map(Vec::as_slice).unwrap_or_default()
	}

	/// Whether `child` is directly contained in `parent`.
	pub fn is_child_of(&self, child: &RefId, parent: &RefId) -> bool {
		self.parents(child).iter().any(|link| &link.refid == parent)
	}
}
