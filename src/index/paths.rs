//! Path-suffix disambiguation for `path::name` targets.
//!
//! C has no namespaces, so the only thing that tells two equally named
//! entities apart is the file that declares them. Every entity is registered
//! under each right-aligned suffix of its declaring path (directory-component
//! granularity); a suffix identifies an entity exactly when its entry holds a
//! single refid.

use std::collections::HashMap;

use crate::model::RefId;

/// Shortest way of writing an entity's declaring path in a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathForm {
	/// A right-aligned suffix that matches no other candidate.
	Suffix(String),
	/// The whole path; needs the `./` marker because it is a suffix of some
	/// other candidate's path.
	Exact(String),
}

/// Split a normalized path into its components.
pub fn components(path: &str) -> Vec<&str> {
	path.split('/').filter(|part| !part.is_empty()).collect()
}

/// Whether `path` ends with the components of `suffix`.
fn ends_with(path: &[&str], suffix: &[&str]) -> bool {
	path.len() >= suffix.len() && path[path.len() - suffix.len()..] == *suffix
}

/// Name-to-path lookup structure.
#[derive(Debug, Default)]
pub struct PathTable {
	/// name -> joined suffix -> refids. The empty suffix holds every
	/// candidate of the name.
	suffixes: HashMap<String, HashMap<String, Vec<RefId>>>,
	/// name -> full path -> refids.
	exact: HashMap<String, HashMap<String, Vec<RefId>>>,
	canonical: HashMap<RefId, PathForm>,
}

impl PathTable {
	/// Build the table from `(name, normalized path, refid)` triples.
	///
	/// Candidates sharing a name are ordered by path components, then refid,
	/// so every list the table hands out is independent of input order.
	pub fn build(entries: impl IntoIterator<Item = (String, String, RefId)>) -> Self {
		let mut by_name: HashMap<String, Vec<(String, RefId)>> = HashMap::new();
		for (name, path, refid) in entries {
			by_name.entry(name).or_default().push((path, refid));
		}

		let mut table = Self::default();
		for (name, mut candidates) in by_name {
			candidates.sort_by(|(pa, ra), (pb, rb)| {
				components(pa).cmp(&components(pb)).then_with(|| ra.cmp(rb))
			});
			table.register(&name, &candidates);
		}
		table
	}

	fn register(&mut self, name: &str, candidates: &[(String, RefId)]) {
		let split: Vec<Vec<&str>> = candidates.iter().map(|(path, _)| components(path)).collect();
		let suffixes = self.suffixes.entry(name.to_string()).or_default();
		let exact = self.exact.entry(name.to_string()).or_default();

		for (i, (path, refid)) in candidates.iter().enumerate() {
			let parts = &split[i];
			suffixes.entry(String::new()).or_default().push(refid.clone());
			exact.entry(parts.join("/")).or_default().push(refid.clone());

			let mut minimal = None;
			for k in 1..=parts.len() {
				let suffix = &parts[parts.len() - k..];
				suffixes.entry(suffix.join("/")).or_default().push(refid.clone());
				if minimal.is_none() {
					let clash = split
						.iter()
						.enumerate()
						.any(|(j, other)| j != i && ends_with(other, suffix));
					if !clash {
						minimal = Some(suffix.join("/"));
					}
				}
			}

			let form = match minimal {
				Some(suffix) => Some(PathForm::Suffix(suffix)),
				None => {
					let full = parts.join("/");
					let twins = split.iter().filter(|other| other.as_slice() == parts.as_slice()).count();
					(twins == 1).then(|| PathForm::Exact(full))
				}
			};
			if let Some(form) = form {
				self.canonical.insert(refid.clone(), form);
			} else {
				tracing::debug!(%refid, name, path = path.as_str(), "no path form identifies entity");
			}
		}
	}

	/// Refids registered for `name` under `suffix` (empty suffix: all of them).
	pub fn by_suffix(&self, name: &str, suffix: &str) -> &[RefId] {
		self.suffixes
			.get(name)
			.and_then(|map| map.get(suffix))
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Refids whose whole declaring path is `path`.
	pub fn by_exact_path(&self, name: &str, path: &str) -> &[RefId] {
		self.exact
			.get(name)
			.and_then(|map| map.get(path))
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Shortest unambiguous path form of `refid`, if any exists.
	pub fn canonical(&self, refid: &RefId) -> Option<&PathForm> {
		self.canonical.get(refid)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn table(entries: &[(&str, &str, &str)]) -> PathTable {
		PathTable::build(
			entries
				.iter()
				.map(|(name, path, refid)| (name.to_string(), path.to_string(), RefId::from(*refid))),
		)
	}

	fn ids(refids: &[RefId]) -> Vec<&str> {
		refids.iter().map(RefId::as_str).collect()
	}

	#[test]
	fn same_base_name_needs_directory() {
		let t = table(&[("f", "c/b.h", "cf"), ("f", "a/b.h", "af")]);
		assert_eq!(ids(t.by_suffix("f", "b.h")), vec!["af", "cf"]);
		assert_eq!(ids(t.by_suffix("f", "a/b.h")), vec!["af"]);
		assert_eq!(ids(t.by_suffix("f", "c/b.h")), vec!["cf"]);
		assert_eq!(ids(t.by_suffix("f", "")), vec!["af", "cf"]);
		assert_eq!(t.canonical(&RefId::from("af")), Some(&PathForm::Suffix("a/b.h".into())));
		assert_eq!(t.canonical(&RefId::from("cf")), Some(&PathForm::Suffix("c/b.h".into())));
	}

	#[test]
	fn unique_name_gets_shortest_suffix() {
		let t = table(&[("g", "src/lib/util.h", "g1")]);
		assert_eq!(ids(t.by_suffix("g", "")), vec!["g1"]);
		assert_eq!(ids(t.by_suffix("g", "util.h")), vec!["g1"]);
		assert_eq!(ids(t.by_suffix("g", "lib/util.h")), vec!["g1"]);
		assert_eq!(ids(t.by_suffix("g", "src/lib/util.h")), vec!["g1"]);
		assert!(t.by_suffix("g", "other.h").is_empty());
		assert_eq!(t.canonical(&RefId::from("g1")), Some(&PathForm::Suffix("util.h".into())));
	}

	#[test]
	fn grows_only_as_far_as_needed() {
		let t = table(&[
			("f", "x/a/b.h", "one"),
			("f", "y/a/b.h", "two"),
			("f", "z/c/b.h", "three"),
		]);
		assert_eq!(t.canonical(&RefId::from("one")), Some(&PathForm::Suffix("x/a/b.h".into())));
		assert_eq!(t.canonical(&RefId::from("two")), Some(&PathForm::Suffix("y/a/b.h".into())));
		assert_eq!(t.canonical(&RefId::from("three")), Some(&PathForm::Suffix("c/b.h".into())));
		assert_eq!(ids(t.by_suffix("f", "a/b.h")), vec!["one", "two"]);
	}

	#[test]
	fn path_that_is_suffix_of_another_needs_exact_form() {
		let t = table(&[("f", "b.h", "short"), ("f", "a/b.h", "long")]);
		assert_eq!(t.canonical(&RefId::from("short")), Some(&PathForm::Exact("b.h".into())));
		assert_eq!(t.canonical(&RefId::from("long")), Some(&PathForm::Suffix("a/b.h".into())));
		assert_eq!(ids(t.by_exact_path("f", "b.h")), vec!["short"]);
	}

	#[test]
	fn identical_paths_have_no_form() {
		let t = table(&[("f", "b.h", "one"), ("f", "b.h", "two")]);
		assert_eq!(t.canonical(&RefId::from("one")), None);
		assert_eq!(ids(t.by_exact_path("f", "b.h")), vec!["one", "two"]);
	}

	#[test]
	fn input_order_does_not_matter() {
		let forward = table(&[("f", "a/b.h", "af"), ("f", "c/b.h", "cf")]);
		let backward = table(&[("f", "c/b.h", "cf"), ("f", "a/b.h", "af")]);
		assert_eq!(forward.by_suffix("f", "b.h"), backward.by_suffix("f", "b.h"));
		assert_eq!(forward.by_suffix("f", ""), backward.by_suffix("f", ""));
	}
}
