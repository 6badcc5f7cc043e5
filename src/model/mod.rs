//! Data model shared by the loader, normalizer, index and resolver.

mod entity;
mod kind;
mod refid;

pub use entity::{Edge, Entity, Location, Relation, RelationSet};
pub use kind::Kind;
pub use refid::RefId;

/// Normalize a path as written by Doxygen: forward slashes, no `./` or
/// leading `/`, no empty components.
pub fn normalize_path(path: &str) -> String {
	path.replace('\\', "/")
		.split('/')
		.filter(|part| !part.is_empty() && *part != ".")
		.collect::<Vec<_>>()
		.join("/")
}

/// Strip the `Outer::` scope of a name.
pub fn barename(name: &str) -> &str {
	name.rsplit("::").next().unwrap_or(name)
}
