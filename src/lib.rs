//! Core library for doxref: index Doxygen XML output and resolve human-typed
//! references to documented C entities.
//!
//! This crate provides the high-level [`DoxyIndex`] API, which reads a
//! Doxygen XML directory once and then answers `resolve`, `children_of` and
//! `guess_kind` queries. It is designed to be UI-agnostic and can be used by
//! any frontend (CLI, documentation generator, language server, etc.).

/// Shared data model: kinds, refids, entities and containment edges.
pub mod model;

/// Root index and compound document loading.
pub mod loader;

/// Conversion of compound documents into entity rows and edges.
pub mod normalize;

/// Lookup tables built from the normalized rows.
pub mod index;

/// Target string resolution and child enumeration.
pub mod resolver;

/// Core API for doxref operations.
pub mod core_api;

// Re-export main public API from core_api
pub use crate::core_api::error::DoxrefError;
pub use crate::core_api::{DoxyIndex, EntityTreeNode, IndexBuilder, IndexStats, Result, build_entity_tree};
pub use crate::model::{Entity, Kind, RefId, Relation, RelationSet};
pub use crate::resolver::{Child, ChildPolicy, ChildSelection, DomainRole, RenderFlags, Resolver, Target};
