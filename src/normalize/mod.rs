//! Entity normalizer.
//!
//! Walks each compound document once and emits one row per compound,
//! member and enum value. The same member shows up verbatim in its file
//! document and in every group document that lists it, so rows are keyed by
//! refid: the first occurrence is kept and later ones only add containment
//! edges.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::core_api::error::{DoxrefError, Result};
use crate::loader::Element;
use crate::model::{Edge, Entity, Kind, Location, RefId, Relation, barename, normalize_path};

/// Elements whose subtrees never hold definitions or containment references.
/// `listofallmembers` also lists inherited members and must not become edges.
const SKIPPED_SUBTREES: &[&str] = &[
	"briefdescription",
	"detaileddescription",
	"inbodydescription",
	"programlisting",
	"listofallmembers",
	"collaborationgraph",
	"inheritancegraph",
	"incdepgraph",
	"invincdepgraph",
	"templateparamlist",
	"location",
];

/// Refid-keyed table of entity rows plus the containment edges between them.
#[derive(Debug, Default)]
pub struct Catalog {
	entities: HashMap<RefId, Entity>,
	order: Vec<RefId>,
	edges: Vec<Edge>,
	edge_set: HashSet<Edge>,
	duplicates: usize,
}

impl Catalog {
	/// Create an empty catalog.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert `entity` unless its refid is already known.
	///
	/// Returns whether a new row was created. A repeated refid only fills in
	/// fields the first occurrence lacked.
	pub fn insert_entity(&mut self, entity: Entity) -> bool {
		if let Some(existing) = self.entities.get_mut(&entity.refid) {
			self.duplicates += 1;
			if existing.kind != entity.kind {
				debug!(
					refid = %entity.refid,
					kept = %existing.kind,
					ignored = %entity.kind,
					"conflicting kinds for one refid, keeping the first"
				);
				return false;
			}
			if existing.location.is_none() {
				existing.location = entity.location;
			}
			if existing.title.is_none() {
				existing.title = entity.title;
			}
			return false;
		}
		self.order.push(entity.refid.clone());
		self.entities.insert(entity.refid.clone(), entity);
		true
	}

	/// Record a containment edge; repeated edges are ignored.
	pub fn insert_edge(&mut self, parent: RefId, child: RefId, relation: Relation) -> bool {
		if parent == child {
			debug!(refid = %parent, "self-containment edge ignored");
			return false;
		}
		let edge = Edge {
			parent,
			child,
			relation,
		};
		if !self.edge_set.insert(edge.clone()) {
			return false;
		}
		self.edges.push(edge);
		true
	}

	/// Row stored for `refid`.
	pub fn get(&self, refid: &RefId) -> Option<&Entity> {
		self.entities.get(refid)
	}

	/// Number of distinct entities.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Whether no entity has been recorded.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Recorded edges, in insertion order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// How many repeated occurrences were folded into existing rows.
	pub fn duplicates(&self) -> usize {
		self.duplicates
	}

	/// Entities in first-seen order, plus edges in insertion order.
	pub fn into_parts(mut self) -> (Vec<Entity>, Vec<Edge>) {
		let entities = self
			.order
			.iter()
			.filter_map(|refid| self.entities.remove(refid))
			.collect();
		(entities, self.edges)
	}
}

/// The compound whose document is being walked.
struct Scope<'a> {
	refid: &'a RefId,
	kind: Kind,
	path: Option<&'a str>,
}

fn location_of(element: &Element, fallback: Option<&str>) -> Option<Location> {
	let loc = element.child("location");
	let file = loc
		.and_then(|l| l.attr("file"))
		.map(normalize_path)
		.filter(|path| !path.is_empty())
		.or_else(|| fallback.map(str::to_string))?;
	let line = loc.and_then(|l| l.attr("line")).and_then(|line| line.parse().ok());
	Some(Location { file, line })
}

/// Feed every definition of one compound document into `catalog`.
pub fn normalize_document(catalog: &mut Catalog, path: &Path, root: &Element) -> Result<()> {
	let defs: Vec<&Element> = root.elements().filter(|el| el.name() == "compounddef").collect();
	if defs.is_empty() {
		return Err(DoxrefError::MalformedDocument {
			path: path.to_path_buf(),
			reason: format!("no <compounddef> under <{}>", root.name()),
		});
	}
	for def in defs {
		normalize_compound(catalog, path, def)?;
	}
	Ok(())
}

fn normalize_compound(catalog: &mut Catalog, path: &Path, def: &Element) -> Result<()> {
	let id = def.attr("id").ok_or_else(|| DoxrefError::MalformedDocument {
		path: path.to_path_buf(),
		reason: "<compounddef> without id".to_string(),
	})?;
	let kind_attr = def.attr("kind").unwrap_or_default();
	let Some(kind) = Kind::from_xml(kind_attr) else {
		debug!(refid = id, kind = kind_attr, "unsupported compound kind skipped");
		return Ok(());
	};

	let refid = RefId::from(id);
	let compound_name = def.child_text("compoundname").unwrap_or_default();
	let name = match kind {
		Kind::File => compound_name.rsplit('/').next().unwrap_or_default().to_string(),
		_ => barename(&compound_name).to_string(),
	};
	let location = if kind.is_synthetic() {
		None
	} else if kind == Kind::File {
		location_of(def, Some(compound_name.as_str())).map(|loc| Location {
			file: normalize_path(&loc.file),
			line: None,
		})
	} else {
		location_of(def, None)
	};
	let title = def.child_text("title").filter(|t| !t.is_empty());

	catalog.insert_entity(Entity {
		refid: refid.clone(),
		kind,
		name,
		title,
		location: location.clone(),
		parent: None,
	});

	let scope = Scope {
		refid: &refid,
		kind,
		path: location.as_ref().map(|loc| loc.file.as_str()),
	};
	walk(catalog, def, &scope);
	Ok(())
}

fn walk(catalog: &mut Catalog, element: &Element, scope: &Scope<'_>) {
	for child in element.elements() {
		match child.name() {
			"memberdef" => member(catalog, child, scope),
			"member" => member_reference(catalog, child, scope),
			name if SKIPPED_SUBTREES.contains(&name) => {}
			name if name.starts_with("inner") => inner(catalog, child, scope),
			_ => walk(catalog, child, scope),
		}
	}
}

fn inner(catalog: &mut Catalog, element: &Element, scope: &Scope<'_>) {
	let suffix = &element.name()["inner".len()..];
	let Some(kind) = Kind::from_xml(suffix).filter(|k| k.is_compound()) else {
		return;
	};
	let Some(child) = element.attr("refid") else {
		return;
	};
	debug!(parent = %scope.refid, child, %kind, "inner compound");
	catalog.insert_edge(
		scope.refid.clone(),
		RefId::from(child),
		Relation::for_parent(scope.kind),
	);
}

fn member_reference(catalog: &mut Catalog, element: &Element, scope: &Scope<'_>) {
	let supported = element.attr("kind").and_then(Kind::from_xml).is_some();
	if let (true, Some(child)) = (supported, element.attr("refid")) {
		catalog.insert_edge(
			scope.refid.clone(),
			RefId::from(child),
			Relation::for_parent(scope.kind),
		);
	}
}

fn member(catalog: &mut Catalog, def: &Element, scope: &Scope<'_>) {
	let Some(id) = def.attr("id") else {
		return;
	};
	let kind_attr = def.attr("kind").unwrap_or_default();
	let Some(kind) = Kind::from_xml(kind_attr) else {
		debug!(refid = id, kind = kind_attr, "unsupported member kind skipped");
		return;
	};

	let refid = RefId::from(id);
	let name = def.child_text("name").unwrap_or_default();
	let location = location_of(def, scope.path);
	catalog.insert_entity(Entity {
		refid: refid.clone(),
		kind,
		name: barename(&name).to_string(),
		title: None,
		location: location.clone(),
		parent: None,
	});
	catalog.insert_edge(scope.refid.clone(), refid.clone(), Relation::for_parent(scope.kind));

	for value in def.elements().filter(|el| el.name() == "enumvalue") {
		let Some(value_id) = value.attr("id") else {
			continue;
		};
		let value_refid = RefId::from(value_id);
		let value_name = value.child_text("name").unwrap_or_default();
		catalog.insert_entity(Entity {
			refid: value_refid.clone(),
			kind: Kind::EnumValue,
			name: value_name,
			title: None,
			location: location.as_ref().map(|loc| Location {
				file: loc.file.clone(),
				line: None,
			}),
			parent: None,
		});
		catalog.insert_edge(refid.clone(), value_refid, Relation::Field);
	}
}
