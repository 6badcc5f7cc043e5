use std::fmt;
use std::path::PathBuf;

use crate::model::{Kind, RefId};

/// One of several entities a target could refer to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Candidate {
	/// Refid of the competing entity.
	pub refid: RefId,
	/// Its kind.
	pub kind: Kind,
	/// Its (qualified) name.
	pub name: String,
	/// Its declaring file, if it has one.
	pub path: Option<String>,
}

impl fmt::Display for Candidate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.path {
			Some(path) => write!(f, "{} ({} {} in {path})", self.refid, self.kind, self.name),
			None => write!(f, "{} ({} {})", self.refid, self.kind, self.name),
		}
	}
}

fn list_candidates(candidates: &[Candidate]) -> String {
	candidates
		.iter()
		.map(|c| format!("\n  - {c}"))
		.collect()
}

/// Aggregate errors produced by the doxref library.
#[derive(Debug, thiserror::Error)]
pub enum DoxrefError {
	/// A document could not be read.
	#[error("cannot read document `{}`: {source}", .path.display())]
	DocumentMissing {
		/// Offending path.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// A document is not well-formed XML or lacks required structure.
	#[error("malformed document `{}`: {reason}", .path.display())]
	MalformedDocument {
		/// Offending path.
		path: PathBuf,
		/// What went wrong.
		reason: String,
	},
	/// A target resolved to zero entities.
	#[error("cannot resolve target: {0}")]
	NotFound(String),
	/// A target resolved to more than one entity.
	#[error("target `{target}` resolves to more than one element:{}", list_candidates(.candidates))]
	Ambiguous {
		/// Literal target as typed.
		target: String,
		/// Every matching entity, in deterministic order.
		candidates: Vec<Candidate>,
	},
	/// A kind has no domain role.
	#[error("no domain role for kind `{0}`")]
	UnknownKind(Kind),
	/// A target string does not follow any of the reference syntaxes.
	#[error("malformed target string: {0}")]
	MalformedTarget(String),
}

impl DoxrefError {
	/// Whether this error belongs to the construction phase and may be
	/// collected as a warning instead of aborting the build.
	pub fn is_document_error(&self) -> bool {
		matches!(self, Self::DocumentMissing { .. } | Self::MalformedDocument { .. })
	}
}

/// Result type returned by the doxref library.
pub type Result<T> = std::result::Result<T, DoxrefError>;
