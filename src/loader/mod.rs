//! Document loader: reads the root `index.xml` eagerly and compound documents
//! on demand, caching every parsed compound for the rest of the run.

mod tree;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

pub use self::tree::{Descendants, Element, parse_document};
use crate::core_api::error::{DoxrefError, Result};
use crate::model::{Kind, RefId};

/// Default file name of the root index document.
pub const DEFAULT_INDEX_FILE: &str = "index.xml";

/// One `<compound>` entry of the root index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundEntry {
	/// Refid of the compound.
	pub refid: RefId,
	/// Kind of the compound.
	pub kind: Kind,
	/// Name as listed in the index.
	pub name: String,
	/// Path of the compound document.
	pub locator: PathBuf,
}

/// Reads Doxygen XML documents from one output directory.
#[derive(Debug)]
pub struct Loader {
	xml_dir: PathBuf,
	entries: Vec<CompoundEntry>,
	cache: Mutex<HashMap<PathBuf, Arc<Element>>>,
}

/// Read and parse one XML file.
pub fn read_document(path: &Path) -> Result<Element> {
	let text = fs::read_to_string(path).map_err(|source| DoxrefError::DocumentMissing {
		path: path.to_path_buf(),
		source,
	})?;
	parse_document(&text).map_err(|reason| DoxrefError::MalformedDocument {
		path: path.to_path_buf(),
		reason,
	})
}

impl Loader {
	/// Open the XML directory and read its root index.
	///
	/// A missing or malformed root index is fatal.
	pub fn open(xml_dir: impl Into<PathBuf>, index_file: &str) -> Result<Self> {
		let xml_dir = xml_dir.into();
		let index_path = xml_dir.join(index_file);
		let root = read_document(&index_path)?;
		if root.name() != "doxygenindex" {
			return Err(DoxrefError::MalformedDocument {
				path: index_path,
				reason: format!("expected <doxygenindex> root, found <{}>", root.name()),
			});
		}

		let mut entries = Vec::new();
		for compound in root.elements().filter(|el| el.name() == "compound") {
			let Some(refid) = compound.attr("refid") else {
				debug!("index compound without refid skipped");
				continue;
			};
			let kind_attr = compound.attr("kind").unwrap_or_default();
			let Some(kind) = Kind::from_xml(kind_attr) else {
				debug!(refid, kind = kind_attr, "unsupported compound kind skipped");
				continue;
			};
			let name = compound.child_text("name").unwrap_or_default();
			entries.push(CompoundEntry {
				refid: RefId::from(refid),
				kind,
				name,
				locator: xml_dir.join(format!("{refid}.xml")),
			});
		}
		debug!(compounds = entries.len(), path = %index_path.display(), "root index read");

		Ok(Self {
			xml_dir,
			entries,
			cache: Mutex::new(HashMap::new()),
		})
	}

	/// Directory the documents are read from.
	pub fn xml_dir(&self) -> &Path {
		&self.xml_dir
	}

	/// Compound entries of the root index, in index order.
	pub fn entries(&self) -> &[CompoundEntry] {
		&self.entries
	}

	/// Path of the compound document of `refid`.
	pub fn locator_for(&self, refid: &RefId) -> PathBuf {
		self.xml_dir.join(format!("{refid}.xml"))
	}

	/// Parsed tree of the document at `locator`. Each document is parsed at
	/// most once; later calls share the cached tree.
	pub fn compound(&self, locator: &Path) -> Result<Arc<Element>> {
		if let Some(tree) = self.lock_cache().get(locator) {
			return Ok(Arc::clone(tree));
		}
		let tree = Arc::new(read_document(locator)?);
		self.lock_cache()
			.insert(locator.to_path_buf(), Arc::clone(&tree));
		Ok(tree)
	}

	/// Number of documents currently cached.
	pub fn cached_documents(&self) -> usize {
		self.lock_cache().len()
	}

	fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<Element>>> {
		// The cache only ever holds complete entries, so a poisoned lock is still usable.
		self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	fn write(dir: &Path, name: &str, text: &str) {
		fs::write(dir.join(name), text).unwrap();
	}

	#[test]
	fn reads_index_entries_and_skips_unknown_kinds() {
		let dir = TempDir::new().unwrap();
		write(
			dir.path(),
			"index.xml",
			r#"<doxygenindex>
  <compound refid="b_8h" kind="file"><name>b.h</name>
    <member refid="b_8h_1af" kind="function"><name>f</name></member>
  </compound>
  <compound refid="concept_x" kind="concept"><name>x</name></compound>
  <compound refid="group__w" kind="group"><name>w</name></compound>
</doxygenindex>"#,
		);

		let loader = Loader::open(dir.path(), DEFAULT_INDEX_FILE).unwrap();
		let entries = loader.entries();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].refid, RefId::from("b_8h"));
		assert_eq!(entries[0].kind, Kind::File);
		assert_eq!(entries[0].name, "b.h");
		assert_eq!(entries[0].locator, dir.path().join("b_8h.xml"));
		assert_eq!(entries[1].kind, Kind::Group);
	}

	#[test]
	fn missing_root_is_fatal() {
		let dir = TempDir::new().unwrap();
		let err = Loader::open(dir.path(), DEFAULT_INDEX_FILE).unwrap_err();
		assert!(matches!(err, DoxrefError::DocumentMissing { .. }));
	}

	#[test]
	fn wrong_root_element_is_malformed() {
		let dir = TempDir::new().unwrap();
		write(dir.path(), "index.xml", "<doxygen/>");
		let err = Loader::open(dir.path(), DEFAULT_INDEX_FILE).unwrap_err();
		assert!(matches!(err, DoxrefError::MalformedDocument { .. }));
	}

	#[test]
	fn compounds_are_cached_per_locator() {
		let dir = TempDir::new().unwrap();
		write(dir.path(), "index.xml", "<doxygenindex/>");
		write(dir.path(), "b_8h.xml", "<doxygen><compounddef id=\"b_8h\" kind=\"file\"/></doxygen>");
		let loader = Loader::open(dir.path(), DEFAULT_INDEX_FILE).unwrap();

		let locator = loader.locator_for(&RefId::from("b_8h"));
		let first = loader.compound(&locator).unwrap();
		let second = loader.compound(&locator).unwrap();
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(loader.cached_documents(), 1);

		let missing = loader.compound(&dir.path().join("nope.xml")).unwrap_err();
		assert!(missing.is_document_error());
	}
}
