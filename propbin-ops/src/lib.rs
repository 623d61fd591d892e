//! Structural transformations over propbin containers.
//!
//! Every engine reads whole containers through a [`ContainerCodec`],
//! transforms them in memory, and writes results atomically only after the
//! whole transformation succeeded:
//!
//! - [`Extractor`] moves entries of one type into a new linked container
//! - [`Wrapper`] splits each VFX emitter into its own triggered system
//! - [`Merger`] folds linked containers back in, deduplicating by identity
//! - [`CloneRewriter`] writes renamed copies for every skin variant
//! - [`Pruner`] removes systems the resource resolver no longer references
//!
//! The free functions ([`extract`], [`wrap_container`], [`merge_entries`],
//! [`prune`], ...) are the in-memory cores the engines are built on.
//!
//! [`ContainerCodec`]: propbin_model::ContainerCodec

pub mod clone;
pub mod config;
mod context;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod layout;
pub mod merge;
pub mod prune;
pub mod schema;
pub mod wrap;

pub use clone::{CloneReport, CloneRewriter, VariantRewriter};
pub use config::ToolConfig;
pub use context::OpsContext;
pub use dedup::{ConflictPolicy, IdentityIndex};
pub use error::{OpsError, OpsResult};
pub use extract::{ExtractOutcome, ExtractReport, Extractor, extract, split_entries};
pub use merge::{HashedFileIndex, MergeReport, Merger, merge_entries, retain_links};
pub use prune::{PrunePolicy, PruneReport, Pruner, prune};
pub use schema::TypeMatcher;
pub use wrap::{WrapReport, Wrapper, wrap_container};
