//! Core library API for doxref.
//!
//! [`DoxyIndex`] ties the loader, normalizer, index builder and resolver
//! together: it is built once from a Doxygen XML directory and then answers
//! any number of read-only queries. It is UI-agnostic; the CLI is only one
//! possible frontend.

/// Build configuration.
pub mod config;
/// Error helpers for the core API.
pub mod error;
/// Hierarchical tree structure for containment output.
pub mod list_tree;
/// Pattern utilities for name filters.
pub mod pattern;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

pub use self::config::{DEFAULT_TREE_DEPTH, IndexBuilder, XML_DIR_ENV, xml_dir_from_env};
use self::error::DoxrefError;
pub use self::error::{Candidate, Result};
pub use self::list_tree::{EntityTreeNode, build_entity_tree};
pub use self::pattern::name_matcher;
use crate::index::EntityIndex;
use crate::loader::{Element, Loader};
use crate::model::{Entity, Kind, RefId, RelationSet};
use crate::normalize::{Catalog, normalize_document};
use crate::resolver::{Child, ChildPolicy, DomainRole, Parent, Resolver};

/// Counters describing a built index.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IndexStats {
	/// Distinct entities.
	pub entities: usize,
	/// Containment edges.
	pub edges: usize,
	/// Entities containing at least one other.
	pub parents: usize,
	/// Compound documents listed by the root index.
	pub documents: usize,
	/// Construction warnings.
	pub warnings: usize,
	/// Entity count per kind.
	pub kinds: BTreeMap<Kind, usize>,
}

/// An immutable index over one Doxygen XML output directory.
#[derive(Debug)]
pub struct DoxyIndex {
	loader: Loader,
	index: EntityIndex,
	warnings: Vec<DoxrefError>,
	children_limit: usize,
}

impl DoxyIndex {
	/// Build an index over `xml_dir` with default settings.
	pub fn open(xml_dir: impl Into<std::path::PathBuf>) -> Result<Self> {
		IndexBuilder::new(xml_dir).build()
	}

	/// Build an index as configured by `builder`.
	///
	/// A missing root index is fatal. Unreadable or malformed compound
	/// documents are skipped and collected as warnings, unless the builder
	/// is strict, in which case the first one is returned as the error.
	pub fn build(builder: IndexBuilder) -> Result<Self> {
		let loader = Loader::open(&builder.xml_dir, &builder.index_file)?;

		let mut catalog = Catalog::new();
		let mut warnings = Vec::new();
		for entry in loader.entries() {
			let outcome = loader
				.compound(&entry.locator)
				.and_then(|root| normalize_document(&mut catalog, &entry.locator, &root));
			if let Err(err) = outcome {
				debug!(refid = %entry.refid, "compound document skipped");
				warnings.push(err);
			}
		}
		if builder.strict && !warnings.is_empty() {
			return Err(warnings.swap_remove(0));
		}

		let duplicates = catalog.duplicates();
		let (entities, edges) = catalog.into_parts();
		let index = EntityIndex::build(entities, edges);
		info!(
			entities = index.len(),
			edges = index.edge_count(),
			duplicates,
			warnings = warnings.len(),
			"doxygen index built"
		);
		for warning in &warnings {
			warn!("{warning}");
		}

		Ok(Self {
			loader,
			index,
			warnings,
			children_limit: builder.children_limit,
		})
	}

	/// Construction warnings, in document order.
	pub fn warnings(&self) -> &[DoxrefError] {
		&self.warnings
	}

	/// The document loader, for fetching element trees.
	pub fn loader(&self) -> &Loader {
		&self.loader
	}

	/// The underlying lookup tables.
	pub fn index(&self) -> &EntityIndex {
		&self.index
	}

	/// A resolver over this index.
	pub fn resolver(&self) -> Resolver<'_> {
		Resolver::new(&self.index)
	}

	/// Default child policy, honoring the configured breadth bound.
	pub fn child_policy(&self) -> ChildPolicy {
		ChildPolicy::default().with_limit(self.children_limit)
	}

	/// Resolve a target string to exactly one refid.
	pub fn resolve(&self, target: &str) -> Result<RefId> {
		self.resolver().resolve(target)
	}

	/// Resolve a target string, preferring direct children of `scope`.
	pub fn resolve_in_scope(&self, target: &str, scope: &RefId) -> Result<RefId> {
		self.resolver().resolve_in_scope(target, scope)
	}

	/// Resolve by kind and name, preferring direct children of `scope`.
	pub fn resolve_name(&self, kind: Option<Kind>, name: &str, scope: Option<&RefId>) -> Result<RefId> {
		self.resolver().resolve_name(kind, name, scope)
	}

	/// Canonical target string of `refid`.
	pub fn target_of(&self, refid: &RefId) -> Result<String> {
		self.resolver().target_of(refid)
	}

	/// Children of `refid` selected by `policy`.
	pub fn children_of(&self, refid: &RefId, policy: &ChildPolicy) -> Result<Vec<Child>> {
		self.resolver().children_of(refid, policy)
	}

	/// Rendering role of `refid`.
	pub fn guess_kind(&self, refid: &RefId) -> Result<DomainRole> {
		self.resolver().guess_kind(refid)
	}

	/// Entity stored under `refid`.
	pub fn get(&self, refid: &RefId) -> Result<&Entity> {
		self.resolver().get(refid)
	}

	/// Direct compound containers of `refid`.
	pub fn parents_of(&self, refid: &RefId) -> Result<Vec<Parent>> {
		self.resolver().parents_of(refid)
	}

	/// Entities of the given kinds (all non-subordinate kinds when empty).
	pub fn find(&self, kinds: &[Kind], no_parent: bool) -> Vec<&Entity> {
		self.resolver().find(kinds, no_parent)
	}

	/// Containment tree below `refid`.
	pub fn entity_tree(&self, refid: &RefId, relations: RelationSet, depth: usize) -> Result<EntityTreeNode> {
		build_entity_tree(&self.index, refid, relations, depth)
			.ok_or_else(|| DoxrefError::NotFound(format!("!{refid}")))
	}

	/// The XML element defining `refid`.
	///
	/// Compounds are read from their own document. Members are looked up in
	/// the documents of their compound containers, falling back to the
	/// compound their refid is namespaced under; enum values go through
	/// their enum.
	pub fn definition(&self, refid: &RefId) -> Result<Element> {
		let entity = self.get(refid)?;
		let (tag, host) = if entity.kind.is_compound() {
			("compounddef", None)
		} else if entity.kind.is_subordinate() {
			let host = self
				.index
				.parents(refid)
				.iter()
				.find(|link| self.index.get(&link.refid).is_some_and(|p| p.kind == Kind::Enum))
				.map(|link| link.refid.clone());
			("enumvalue", host)
		} else {
			("memberdef", Some(refid.clone()))
		};

		let documents: Vec<RefId> = match &host {
			None if entity.kind.is_compound() => vec![refid.clone()],
			None => Vec::new(),
			Some(member) => {
				let mut docs: Vec<RefId> = self
					.index
					.parents(member)
					.iter()
					.filter(|link| self.index.get(&link.refid).is_some_and(|p| p.kind.is_compound()))
					.map(|link| link.refid.clone())
					.collect();
				docs.extend(member.compound_prefix());
				docs
			}
		};

		for document in documents {
			let locator = self.loader.locator_for(&document);
			let root = match self.loader.compound(&locator) {
				Ok(root) => root,
				Err(err) => {
					debug!(%refid, "{err}");
					continue;
				}
			};
			if let Some(found) = root.find_by_id(tag, refid.as_str()) {
				return Ok(found.clone());
			}
		}
		Err(DoxrefError::NotFound(format!("definition of !{refid}")))
	}

	/// Counters describing the index.
	pub fn stats(&self) -> IndexStats {
		let mut kinds = BTreeMap::new();
		for entity in self.index.entities() {
			*kinds.entry(entity.kind).or_insert(0) += 1;
		}
		IndexStats {
			entities: self.index.len(),
			edges: self.index.edge_count(),
			parents: self.index.parent_count(),
			documents: self.loader.entries().len(),
			warnings: self.warnings.len(),
			kinds,
		}
	}
}
