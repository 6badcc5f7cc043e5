//! Query surface over a built [`EntityIndex`].
//!
//! Everything here is read-only; a [`Resolver`] is a borrowed view and may be
//! created as often as convenient.

mod children;
mod role;
mod target;

use std::collections::HashSet;

pub use self::children::{Child, ChildPolicy, ChildSelection, DEFAULT_CHILDREN_LIMIT, RenderFlags};
pub use self::role::DomainRole;
pub use self::target::{Target, TargetPath};
use crate::core_api::error::{Candidate, DoxrefError, Result};
use crate::index::{EntityIndex, FILE_SELF, Link, PathForm};
use crate::model::{Entity, Kind, RefId, Relation};

/// A containing entity and how it contains the queried one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Parent {
	/// Refid of the container.
	pub refid: RefId,
	/// Kind of the container.
	pub kind: Kind,
	/// Name of the container.
	pub name: String,
	/// Kind of containment.
	pub relation: Relation,
}

/// Resolves target strings and walks containment over one index.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
	index: &'a EntityIndex,
}

impl<'a> Resolver<'a> {
	/// Create a resolver over `index`.
	pub fn new(index: &'a EntityIndex) -> Self {
		Self { index }
	}

	/// The underlying index.
	pub fn index(&self) -> &'a EntityIndex {
		self.index
	}

	/// Resolve a target string to exactly one refid.
	pub fn resolve(&self, target: &str) -> Result<RefId> {
		self.resolve_target(&target.parse::<Target>()?, target.trim(), None)
	}

	/// Like [`Resolver::resolve`], but among several candidates the single
	/// one directly contained in `scope` wins.
	pub fn resolve_in_scope(&self, target: &str, scope: &RefId) -> Result<RefId> {
		self.resolve_target(&target.parse::<Target>()?, target.trim(), Some(scope))
	}

	/// Resolve by name, optionally restricted to `kind` and preferring
	/// children of `scope`.
	pub fn resolve_name(&self, kind: Option<Kind>, name: &str, scope: Option<&RefId>) -> Result<RefId> {
		let target = Target::Named {
			kind,
			name: name.trim().to_string(),
		};
		self.resolve_target(&target, &target.to_string(), scope)
	}

	/// Resolve an already parsed target. `literal` is reported in errors.
	pub fn resolve_target(&self, target: &Target, literal: &str, scope: Option<&RefId>) -> Result<RefId> {
		match target {
			Target::RefId(refid) => {
				if self.index.contains(refid) {
					Ok(refid.clone())
				} else {
					Err(DoxrefError::NotFound(literal.to_string()))
				}
			}
			Target::Named { kind, name } => {
				let candidates = match kind {
					Some(kind) => self.index.by_kind_name(*kind, name),
					None => self.index.by_name(name),
				};
				self.pick(candidates, literal, scope)
			}
			Target::Path { path, name } => {
				let paths = self.index.paths();
				let candidates = match path {
					Some(p) if p.exact => paths.by_exact_path(name, &p.path),
					Some(p) => paths.by_suffix(name, &p.path),
					None => paths.by_suffix(name, ""),
				};
				if candidates.is_empty() && path.is_none() {
					return self.pick(self.index.by_name(name), literal, scope);
				}
				self.pick(candidates, literal, scope)
			}
		}
	}

	fn pick(&self, candidates: &[RefId], literal: &str, scope: Option<&RefId>) -> Result<RefId> {
		match candidates {
			[] => Err(DoxrefError::NotFound(literal.to_string())),
			[only] => Ok(only.clone()),
			many => {
				if let Some(scope) = scope {
					let in_scope: Vec<&RefId> = many
						.iter()
						.filter(|refid| self.index.is_child_of(refid, scope))
						.collect();
					if let [only] = in_scope.as_slice() {
						return Ok((*only).clone());
					}
				}
				Err(DoxrefError::Ambiguous {
					target: literal.to_string(),
					candidates: many.iter().filter_map(|refid| self.candidate(refid)).collect(),
				})
			}
		}
	}

	fn candidate(&self, refid: &RefId) -> Option<Candidate> {
		let entity = self.index.get(refid)?;
		Some(Candidate {
			refid: refid.clone(),
			kind: entity.kind,
			name: self
				.index
				.qualified_name(refid)
				.unwrap_or(&entity.name)
				.to_string(),
			path: entity.file_path().map(str::to_string),
		})
	}

	/// Entity stored under `refid`.
	pub fn get(&self, refid: &RefId) -> Result<&'a Entity> {
		self.index
			.get(refid)
			.ok_or_else(|| DoxrefError::NotFound(format!("!{refid}")))
	}

	/// Canonical target string of `refid`; resolving it yields `refid` again.
	pub fn target_of(&self, refid: &RefId) -> Result<String> {
		let entity = self.get(refid)?;
		let mut forms = Vec::new();

		let name = match entity.kind {
			Kind::File => Some(FILE_SELF),
			kind if kind.is_synthetic() => None,
			_ => self.index.qualified_name(refid),
		};
		if let Some(name) = name {
			match self.index.paths().canonical(refid) {
				Some(PathForm::Suffix(suffix)) => forms.push(format!("{suffix}::{name}")),
				Some(PathForm::Exact(path)) => forms.push(format!("./{path}::{name}")),
				None => {}
			}
			if entity.kind != Kind::File {
				forms.push(name.to_string());
			}
		}
		forms.push(format!("{}[{}]", entity.kind, entity.name));
		if let Some(qualified) = self.index.qualified_name(refid).filter(|q| *q != entity.name) {
			forms.push(format!("{}[{qualified}]", entity.kind));
		}

		Ok(forms
			.into_iter()
			.find(|form| self.resolve(form).ok().as_ref() == Some(refid))
			.unwrap_or_else(|| format!("!{refid}")))
	}

	/// Direct compound containers of `refid`.
	pub fn parents_of(&self, refid: &RefId) -> Result<Vec<Parent>> {
		self.get(refid)?;
		Ok(self
			.index
			.parents(refid)
			.iter()
			.filter_map(|link| {
				let parent = self.index.get(&link.refid)?;
				parent.kind.is_compound().then(|| Parent {
					refid: link.refid.clone(),
					kind: parent.kind,
					name: parent.name.clone(),
					relation: link.relation,
				})
			})
			.collect())
	}

	/// Entities of the given kinds, in refid order.
	///
	/// An empty `kinds` means every kind except subordinate ones. With
	/// `no_parent`, only entities without a containing compound are listed.
	pub fn find(&self, kinds: &[Kind], no_parent: bool) -> Vec<&'a Entity> {
		let mut found: Vec<&Entity> = self
			.index
			.entities()
			.filter(|entity| {
				if kinds.is_empty() {
					!entity.kind.is_subordinate()
				} else {
					kinds.contains(&entity.kind)
				}
			})
			.filter(|entity| !no_parent || entity.parent.is_none())
			.collect();
		found.sort_by(|a, b| a.refid.cmp(&b.refid));
		found
	}

	/// Children of `refid` selected by `policy`.
	///
	/// Non-compound members come first and compounds after them, each group
	/// in document order; an `Include` selection follows the order of its
	/// names instead. At most `policy.limit` children are returned.
	pub fn children_of(&self, refid: &RefId, policy: &ChildPolicy) -> Result<Vec<Child>> {
		let parent = self.get(refid)?;

		let mut seen = HashSet::new();
		let links: Vec<(&Link, &Entity)> = self
			.index
			.children(refid)
			.iter()
			.filter(|link| policy.relations.includes(link.relation))
			.filter(|link| seen.insert(&link.refid))
			.filter_map(|link| Some((link, self.index.get(&link.refid)?)))
			.collect();

		let selected: Vec<(&Link, &Entity)> = match &policy.selection {
			ChildSelection::Include(names) => {
				let mut ordered = Vec::new();
				for name in names {
					let before = ordered.len();
					ordered.extend(links.iter().filter(|(_, child)| child.name == *name).copied());
					if ordered.len() == before {
						return Err(DoxrefError::NotFound(format!("{name} (child of !{refid})")));
					}
				}
				ordered
			}
			selection => {
				let keep = |child: &Entity| match selection {
					ChildSelection::OtherKinds => child.kind != parent.kind,
					ChildSelection::Exclude(names) => !names.contains(&child.name),
					_ => true,
				};
				let (members, compounds): (Vec<_>, Vec<_>) = links
					.iter()
					.copied()
					.filter(|(_, child)| keep(child))
					.partition(|(_, child)| !child.kind.is_compound());
				members.into_iter().chain(compounds).collect()
			}
		};

		if selected.len() > policy.limit {
			tracing::debug!(parent = %refid, found = selected.len(), limit = policy.limit, "children truncated");
		}
		Ok(selected
			.into_iter()
			.take(policy.limit)
			.map(|(link, child)| Child {
				refid: link.refid.clone(),
				kind: child.kind,
				name: child.name.clone(),
				relation: link.relation,
				options: policy.options,
			})
			.collect())
	}

	/// Rendering role of `refid`.
	pub fn guess_kind(&self, refid: &RefId) -> Result<DomainRole> {
		let entity = self.get(refid)?;
		match entity.kind {
			Kind::Enum | Kind::Struct | Kind::Union | Kind::Typedef => Ok(DomainRole::Type),
			Kind::Define => Ok(DomainRole::Macro),
			Kind::Function => Ok(DomainRole::Function),
			Kind::Variable => {
				let in_record = self.index.parents(refid).iter().any(|link| {
					self.index
						.get(&link.refid)
						.is_some_and(|p| matches!(p.kind, Kind::Struct | Kind::Union))
				});
				Ok(if in_record {
					DomainRole::Member
				} else {
					DomainRole::Var
				})
			}
			other => Err(DoxrefError::UnknownKind(other)),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::{Edge, Location, RelationSet};

	fn entity(refid: &str, kind: Kind, name: &str, file: Option<&str>) -> Entity {
		Entity {
			refid: RefId::from(refid),
			kind,
			name: name.to_string(),
			title: None,
			location: file.map(|f| Location {
				file: f.to_string(),
				line: Some(1),
			}),
			parent: None,
		}
	}

	fn edge(parent: &str, child: &str, relation: Relation) -> Edge {
		Edge {
			parent: RefId::from(parent),
			child: RefId::from(child),
			relation,
		}
	}

	/// `a/b.h` and `c/b.h` both declare `f`; a group and a struct share the
	/// name `Widgets`.
	fn corpus() -> EntityIndex {
		EntityIndex::build(
			vec![
				entity("a_2b_8h", Kind::File, "b.h", Some("a/b.h")),
				entity("c_2b_8h", Kind::File, "b.h", Some("c/b.h")),
				entity("a_2b_8h_1af", Kind::Function, "f", Some("a/b.h")),
				entity("c_2b_8h_1af", Kind::Function, "f", Some("c/b.h")),
				entity("a_2b_8h_1ag", Kind::Function, "g", Some("a/b.h")),
				entity("a_2b_8h_1aMAX", Kind::Define, "MAX", Some("a/b.h")),
				entity("a_2b_8h_1aglobal", Kind::Variable, "global", Some("a/b.h")),
				entity("structWidgets", Kind::Struct, "Widgets", Some("a/b.h")),
				entity("structWidgets_1aw", Kind::Variable, "width", Some("a/b.h")),
				entity("group__widgets", Kind::Group, "Widgets", None),
				entity("dir_a", Kind::Dir, "a", None),
				entity("a_2b_8h_1acolor", Kind::Enum, "color", Some("a/b.h")),
				entity("a_2b_8h_1ared", Kind::EnumValue, "RED", Some("a/b.h")),
			],
			vec![
				edge("dir_a", "a_2b_8h", Relation::Nested),
				edge("a_2b_8h", "structWidgets", Relation::FileMember),
				edge("a_2b_8h", "a_2b_8h_1af", Relation::FileMember),
				edge("a_2b_8h", "a_2b_8h_1ag", Relation::FileMember),
				edge("a_2b_8h", "a_2b_8h_1aMAX", Relation::FileMember),
				edge("a_2b_8h", "a_2b_8h_1aglobal", Relation::FileMember),
				edge("a_2b_8h", "a_2b_8h_1acolor", Relation::FileMember),
				edge("a_2b_8h_1acolor", "a_2b_8h_1ared", Relation::Field),
				edge("c_2b_8h", "c_2b_8h_1af", Relation::FileMember),
				edge("structWidgets", "structWidgets_1aw", Relation::Field),
				edge("group__widgets", "a_2b_8h_1ag", Relation::GroupMember),
				edge("group__widgets", "structWidgets", Relation::GroupMember),
			],
		)
	}

	fn id(raw: &str) -> RefId {
		RefId::from(raw)
	}

	#[test]
	fn same_name_in_same_base_file_is_ambiguous() {
		let index = corpus();
		let r = Resolver::new(&index);
		match r.resolve("b.h::f") {
			Err(DoxrefError::Ambiguous { target, candidates }) => {
				assert_eq!(target, "b.h::f");
				let ids: Vec<&str> = candidates.iter().map(|c| c.refid.as_str()).collect();
				assert_eq!(ids, vec!["a_2b_8h_1af", "c_2b_8h_1af"]);
			}
			other => panic!("expected ambiguity, got {other:?}"),
		}
		assert_eq!(r.resolve("a/b.h::f").unwrap(), id("a_2b_8h_1af"));
		assert_eq!(r.resolve("c/b.h::f").unwrap(), id("c_2b_8h_1af"));
		assert!(matches!(r.resolve("f"), Err(DoxrefError::Ambiguous { .. })));
	}

	#[test]
	fn bracket_forms_split_group_and_struct() {
		let index = corpus();
		let r = Resolver::new(&index);
		assert!(matches!(r.resolve("[Widgets]"), Err(DoxrefError::Ambiguous { .. })));
		assert_eq!(r.resolve("group[Widgets]").unwrap(), id("group__widgets"));
		assert_eq!(r.resolve("module[Widgets]").unwrap(), id("group__widgets"));
		assert_eq!(r.resolve("struct[Widgets]").unwrap(), id("structWidgets"));
		assert!(matches!(r.resolve("union[Widgets]"), Err(DoxrefError::NotFound(_))));
	}

	#[test]
	fn bare_and_scoped_names() {
		let index = corpus();
		let r = Resolver::new(&index);
		assert_eq!(r.resolve("g").unwrap(), id("a_2b_8h_1ag"));
		assert!(matches!(r.resolve("b.h::*"), Err(DoxrefError::Ambiguous { .. })));
		assert_eq!(r.resolve("a/b.h::*").unwrap(), id("a_2b_8h"));
		assert_eq!(r.resolve("Widgets::width").unwrap(), id("structWidgets_1aw"));
		assert_eq!(r.resolve("b.h::Widgets::width").unwrap(), id("structWidgets_1aw"));
		assert_eq!(r.resolve("width").unwrap(), id("structWidgets_1aw"));
		assert_eq!(r.resolve("RED").unwrap(), id("a_2b_8h_1ared"));
		assert_eq!(r.resolve("color::RED").unwrap(), id("a_2b_8h_1ared"));
		assert!(matches!(r.resolve("nope"), Err(DoxrefError::NotFound(t)) if t == "nope"));
		assert!(matches!(r.resolve("x.h::g"), Err(DoxrefError::NotFound(_))));
	}

	#[test]
	fn refid_form_bypasses_names() {
		let index = corpus();
		let r = Resolver::new(&index);
		assert_eq!(r.resolve("!c_2b_8h_1af").unwrap(), id("c_2b_8h_1af"));
		assert!(matches!(r.resolve("!missing"), Err(DoxrefError::NotFound(_))));
	}

	#[test]
	fn scope_breaks_ties() {
		let index = corpus();
		let r = Resolver::new(&index);
		assert_eq!(r.resolve_in_scope("f", &id("c_2b_8h")).unwrap(), id("c_2b_8h_1af"));
		assert_eq!(
			r.resolve_name(None, "Widgets", Some(&id("a_2b_8h"))).unwrap(),
			id("structWidgets")
		);
		assert!(r.resolve_in_scope("f", &id("group__widgets")).is_err());
	}

	#[test]
	fn every_entity_round_trips_through_its_target() {
		let index = corpus();
		let r = Resolver::new(&index);
		for entity in index.entities() {
			let target = r.target_of(&entity.refid).unwrap();
			assert_eq!(r.resolve(&target).unwrap(), entity.refid, "target {target}");
		}
		assert_eq!(r.target_of(&id("a_2b_8h_1af")).unwrap(), "a/b.h::f");
		assert_eq!(r.target_of(&id("a_2b_8h")).unwrap(), "a/b.h::*");
		assert_eq!(r.target_of(&id("group__widgets")).unwrap(), "group[Widgets]");
		assert_eq!(r.target_of(&id("structWidgets_1aw")).unwrap(), "b.h::Widgets::width");
	}

	#[test]
	fn default_policy_skips_same_kind_and_orders_members_first() {
		let index = corpus();
		let r = Resolver::new(&index);
		let children = r.children_of(&id("a_2b_8h"), &ChildPolicy::default()).unwrap();
		let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["f", "g", "MAX", "global", "color", "Widgets"]);

		let dir = r.children_of(&id("dir_a"), &ChildPolicy::default()).unwrap();
		assert_eq!(dir.len(), 1);
	}

	#[test]
	fn relation_filter_and_inherited_options() {
		let index = corpus();
		let r = Resolver::new(&index);
		let policy = ChildPolicy::new(RelationSet::GROUP).with_options(RenderFlags::NOINDEX);
		let children = r.children_of(&id("group__widgets"), &policy).unwrap();
		let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["g", "Widgets"]);
		assert!(children.iter().all(|c| c.options == RenderFlags::NOINDEX));
		assert!(children.iter().all(|c| c.relation == Relation::GroupMember));

		let none = r
			.children_of(&id("group__widgets"), &ChildPolicy::new(RelationSet::FILE))
			.unwrap();
		assert!(none.is_empty());
	}

	#[test]
	fn include_exclude_and_limit() {
		let index = corpus();
		let r = Resolver::new(&index);
		let include = ChildPolicy::default()
			.with_selection(ChildSelection::Include(vec!["MAX".into(), "f".into()]));
		let names: Vec<String> = r
			.children_of(&id("a_2b_8h"), &include)
			.unwrap()
			.into_iter()
			.map(|c| c.name)
			.collect();
		assert_eq!(names, vec!["MAX", "f"]);

		let missing = ChildPolicy::default().with_selection(ChildSelection::Include(vec!["zzz".into()]));
		assert!(matches!(
			r.children_of(&id("a_2b_8h"), &missing),
			Err(DoxrefError::NotFound(_))
		));

		let exclude = ChildPolicy::default()
			.with_selection(ChildSelection::Exclude(vec!["f".into(), "Widgets".into()]))
			.with_limit(2);
		let names: Vec<String> = r
			.children_of(&id("a_2b_8h"), &exclude)
			.unwrap()
			.into_iter()
			.map(|c| c.name)
			.collect();
		assert_eq!(names, vec!["g", "MAX"]);
	}

	#[test]
	fn roles_follow_kind_and_context() {
		let index = corpus();
		let r = Resolver::new(&index);
		assert_eq!(r.guess_kind(&id("structWidgets")).unwrap(), DomainRole::Type);
		assert_eq!(r.guess_kind(&id("a_2b_8h_1acolor")).unwrap(), DomainRole::Type);
		assert_eq!(r.guess_kind(&id("a_2b_8h_1aMAX")).unwrap(), DomainRole::Macro);
		assert_eq!(r.guess_kind(&id("a_2b_8h_1af")).unwrap(), DomainRole::Function);
		assert_eq!(r.guess_kind(&id("structWidgets_1aw")).unwrap(), DomainRole::Member);
		assert_eq!(r.guess_kind(&id("a_2b_8h_1aglobal")).unwrap(), DomainRole::Var);
		assert!(matches!(
			r.guess_kind(&id("group__widgets")),
			Err(DoxrefError::UnknownKind(Kind::Group))
		));
		assert!(matches!(r.guess_kind(&id("missing")), Err(DoxrefError::NotFound(_))));
	}

	#[test]
	fn parents_and_find() {
		let index = corpus();
		let r = Resolver::new(&index);
		let parents = r.parents_of(&id("a_2b_8h_1ag")).unwrap();
		let ids: Vec<&str> = parents.iter().map(|p| p.refid.as_str()).collect();
		assert_eq!(ids, vec!["a_2b_8h", "group__widgets"]);
		assert!(r.parents_of(&id("a_2b_8h_1ared")).unwrap().is_empty());

		let roots: Vec<&str> = r.find(&[], true).iter().map(|e| e.refid.as_str()).collect();
		assert_eq!(roots, vec!["c_2b_8h", "dir_a", "group__widgets"]);
		let funcs = r.find(&[Kind::Function], false);
		assert_eq!(funcs.len(), 3);
	}
}
