use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    shader::{self, StageKind},
};

/// What a program does after a failure, besides returning the error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum FailurePolicy {
    /// Log and keep going with whatever the driver is left holding: broken
    /// stages stay attached, missing uniforms are skipped, out-of-order calls
    /// are forwarded.
    #[default]
    Continue,
    /// Refuse to build on top of a failure: broken stages are discarded,
    /// linking while a stage kind has failed and uploading to a missing
    /// uniform or an unbound program are errors.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProgramConfig {
    #[serde(default)]
    pub policy: FailurePolicy,
}

impl ProgramConfig {
    pub fn strict() -> Self {
        ProgramConfig {
            policy: FailurePolicy::Strict,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.policy == FailurePolicy::Strict
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageEntry {
    pub path: PathBuf,
    pub kind: StageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgramManifest {
    #[serde(default)]
    pub policy: FailurePolicy,
    pub stages: Vec<StageEntry>,
}

impl ProgramManifest {
    pub fn config(&self) -> ProgramConfig {
        ProgramConfig {
            policy: self.policy,
        }
    }

    pub fn from_ron(text: &str) -> std::result::Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Loads a manifest and resolves relative stage paths against the
    /// manifest's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = shader::load_source(path)?;
        let mut manifest = Self::from_ron(&text).map_err(|source| Error::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(dir) = path.parent() {
            for stage in &mut manifest.stages {
                if stage.path.is_relative() {
                    stage.path = dir.join(&stage.path);
                }
            }
        }

        Ok(manifest)
    }
}
