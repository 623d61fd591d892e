//! Error types for container transformations.

use std::path::PathBuf;

use propbin_hash::Hash;
use thiserror::Error;

/// Result type for transformation operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors that can abort a transformation.
///
/// Absent optional features (no matching entries, no companion entry, no
/// resolver map) are not errors; engines report them and do less.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Reading, decoding, encoding, or writing a container failed.
    #[error(transparent)]
    Model(#[from] propbin_model::ModelError),

    /// Loading a hash dictionary failed.
    #[error(transparent)]
    Hash(#[from] propbin_hash::HashError),

    /// Two distinct records share one identity hash.
    #[error("identity conflict on {identity}: existing type {existing}, incoming type {incoming}")]
    IdentityConflict {
        identity: Hash,
        existing: Hash,
        incoming: Hash,
    },

    /// An entry the transformation cannot run without is missing.
    #[error("no {schema} entry in '{}'", .path.display())]
    MissingEntry { schema: String, path: PathBuf },

    /// Bad argument or filesystem layout.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
