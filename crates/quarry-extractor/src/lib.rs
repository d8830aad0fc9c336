//! Quarry Extractor
//!
//! Converts convention-encoded XML entity files into normalized,
//! cross-referenced JSON documents.
//!
//! # Overview
//!
//! Every field's type is derived from its name alone (a short lowercase
//! prefix such as `i`, `ae` or `aai`), with the element's child shape
//! overriding the name where the two disagree. No category needs dedicated
//! code: categories are declarative `CategoryDef` values.
//!
//! # Architecture
//!
//! ```text
//! files → Decoder → Merger → Filter → Resolver → Normalizer → snapshot
//!                                                                 │
//!                                   (barrier: all categories built)
//!                                                                 ▼
//!                                         Reverse-Index Builder → outputs
//! ```
//!
//! # Key Features
//!
//! - **Name-driven decoding**: scalars, lists and sparse maps from prefixes
//! - **Sentinel removal**: `-1`, `"NONE"` and empty tags never reach output
//! - **Localization**: grammatical forms, gendered keys, nested references
//! - **Reverse indexes**: `requiredBy`-style fields derived after the barrier
//! - **Bounded parallelism**: category builds run on the blocking pool
//!
//! # Example Usage
//!
//! ```no_run
//! use quarry_extractor::{ExtractorConfig, MemorySource, Pipeline};
//! use quarry_domain::{CategoryDef, Registry};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = MemorySource::new()
//!     .with_file("language.xml", "<Root/>")
//!     .with_file("tech.xml", "<Root/>");
//!
//! let registry = Registry {
//!     categories: vec![CategoryDef::new("technologies", "tech.xml")],
//!     reverse_indexes: vec![],
//! };
//!
//! let pipeline = Pipeline::new(ExtractorConfig::default())?;
//! let output = pipeline.run(Arc::new(source), &registry).await?;
//!
//! println!("Entries: {}", output.total_entries());
//! println!("{}", output.diagnostics.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod decoder;
mod diagnostics;
mod error;
mod filter;
mod merger;
mod normalizer;
mod pipeline;
mod reverse_index;
mod source;
mod text;
mod types;
mod xml;


pub use config::{ExtractorConfig, MissingKeyPolicy};
pub use decoder::{decode_entry, decode_file, SourceKind};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::ExtractorError;
pub use filter::evaluate;
pub use merger::{merge, FileRecords};
pub use normalizer::normalize;
pub use pipeline::{build_category, ExtractionContext, Pipeline, FORMS_CATEGORY};
pub use reverse_index::{apply_patches, build_reverse_indexes, ReversePatches};
pub use source::MemorySource;
pub use text::{Language, LanguageTable, Resolution, ResolutionIssue, TextDictionary, TextResolver};
pub use types::{CategoryFailure, CategorySnapshot, RunOutput};
pub use xml::{parse_document, XmlNode};
