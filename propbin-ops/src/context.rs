use std::path::Path;

use propbin_hash::NameResolver;
use propbin_model::{Container, ContainerCodec, read_container, write_container};

use crate::{OpsResult, ToolConfig};

/// What every engine needs: the codec for container bytes, the name
/// dictionary for type matching and logs, and the tool settings.
#[derive(Clone, Copy)]
pub struct OpsContext<'a> {
    pub codec: &'a dyn ContainerCodec,
    pub resolver: &'a NameResolver,
    pub config: &'a ToolConfig,
}

impl<'a> OpsContext<'a> {
    pub fn new(
        codec: &'a dyn ContainerCodec,
        resolver: &'a NameResolver,
        config: &'a ToolConfig,
    ) -> Self {
        Self {
            codec,
            resolver,
            config,
        }
    }

    pub fn extension(&self) -> &str {
        &self.config.extension
    }

    pub fn read(&self, path: &Path) -> OpsResult<Container> {
        Ok(read_container(self.codec, path)?)
    }

    pub fn write(&self, container: &Container, path: &Path) -> OpsResult<u64> {
        Ok(write_container(self.codec, container, path)?)
    }
}
