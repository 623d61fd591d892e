//! Byte-level codecs and atomic container file I/O.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::{Container, Kind, ModelError, ModelResult, Value};

/// Converts between container bytes and the in-memory model.
///
/// The binary game layout lives outside this workspace and plugs in here.
/// [`JsonCodec`] is the reference implementation.
pub trait ContainerCodec {
    /// Parses a full container. Malformed input is [`ModelError::Decode`].
    fn decode(&self, bytes: &[u8]) -> ModelResult<Container>;

    /// Serializes a full container.
    fn encode(&self, container: &Container) -> ModelResult<Vec<u8>>;
}

/// JSON rendition of the container model.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ContainerCodec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> ModelResult<Container> {
        serde_json::from_slice(bytes).map_err(|e| ModelError::decode(e.to_string()))
    }

    fn encode(&self, container: &Container) -> ModelResult<Vec<u8>> {
        ensure_finite(container)?;
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(container)
        } else {
            serde_json::to_vec(container)
        };
        encoded.map_err(|e| ModelError::Encode {
            message: e.to_string(),
            path: None,
        })
    }
}

fn floats(value: &Value) -> &[f32] {
    match value {
        Value::F32(v) => std::slice::from_ref(v),
        Value::Vec2(v) => v,
        Value::Vec3(v) => v,
        Value::Vec4(v) => v,
        Value::Mtx44(v) => v,
        _ => &[],
    }
}

/// First value kind holding a NaN or infinity among the values `walk` visits.
fn first_non_finite(walk: impl FnOnce(&mut dyn FnMut(&Value))) -> Option<Kind> {
    let mut bad = None;
    walk(&mut |v: &Value| {
        if bad.is_none() && floats(v).iter().any(|f| !f.is_finite()) {
            bad = Some(v.kind());
        }
    });
    bad
}

/// JSON has no NaN or infinity; serde_json would write them as `null` and
/// the file could not be decoded again.
fn ensure_finite(container: &Container) -> ModelResult<()> {
    let non_finite = |message: String| ModelError::Encode {
        message,
        path: None,
    };
    for entry in &container.entries {
        if let Some(kind) = first_non_finite(|visit| entry.walk_values(visit)) {
            return Err(non_finite(format!(
                "non-finite {kind:?} in entry {}",
                entry.identity
            )));
        }
    }
    for patch in &container.patches {
        if let Some(kind) = first_non_finite(|visit| patch.value.walk(visit)) {
            return Err(non_finite(format!(
                "non-finite {kind:?} in patch of {}",
                patch.target
            )));
        }
    }
    Ok(())
}

/// Reads and decodes a whole container file.
pub fn read_container(codec: &dyn ContainerCodec, path: &Path) -> ModelResult<Container> {
    let bytes = fs::read(path).map_err(|e| ModelError::io_with_path(e, path))?;
    let container = codec.decode(&bytes).map_err(|e| e.with_path(path))?;
    debug!(
        "Read {} ({} entries, {} links)",
        path.display(),
        container.entries.len(),
        container.links.len()
    );
    Ok(container)
}

/// Encodes `container` and atomically replaces `path` with the result.
///
/// The bytes go to a temporary file in the destination directory which is
/// then renamed over `path`, so readers see either the old file or the
/// complete new one. Missing parent directories are created. Returns the
/// number of bytes written.
pub fn write_container(
    codec: &dyn ContainerCodec,
    container: &Container,
    path: &Path,
) -> ModelResult<u64> {
    let bytes = codec.encode(container).map_err(|e| e.with_path(path))?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| ModelError::io_with_path(e, dir))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ModelError::io_with_path(e, dir))?;
    tmp.write_all(&bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| ModelError::io_with_path(e, tmp.path()))?;
    tmp.persist(path)
        .map_err(|e| ModelError::io_with_path(e.error, path))?;

    debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes.len() as u64)
}
