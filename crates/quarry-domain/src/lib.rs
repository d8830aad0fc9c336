//! Quarry Domain Layer
//!
//! This crate contains the data model shared by the extraction engine and its
//! collaborators. It has no I/O and defines the value types, declarative
//! configuration types, and trait interfaces that the other crates depend upon.
//!
//! ## Key Concepts
//!
//! - **Kind**: structural type of a field, derived from its naming-convention prefix
//! - **TypedValue**: a decoded field value (scalars, lists, sparse maps)
//! - **RawEntry**: one decoded record, before filtering and normalization
//! - **CategoryDef**: declarative description of one output category
//! - **ReverseIndexSpec**: a forward reference field and the reverse field it implies
//! - **CategoryOutput**: the final emitted document for one category
//!
//! ## Architecture
//!
//! - No file system access
//! - Configuration types are plain serde data (no closures)
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod entry;
pub mod kind;
pub mod output;
pub mod registry;
pub mod relationship;
pub mod traits;
pub mod value;

// Re-exports for convenience
pub use category::{CategoryDef, Literal, Predicate, TextBinding};
pub use entry::{NormalizedEntity, RawEntry};
pub use kind::{classify, output_key, Classification, Kind};
pub use output::{CategoryOutput, FormsDocument, OutputMeta};
pub use registry::Registry;
pub use relationship::{Cardinality, ReverseIndexSpec};
pub use traits::SourceProvider;
pub use value::TypedValue;
