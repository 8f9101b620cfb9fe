use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Pipeline role a shader stage is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum StageKind {
    Vertex,
    Fragment,
    TessControl,
    TessEvaluation,
    Geometry,
    Compute,
}

impl StageKind {
    pub const COUNT: usize = 6;

    pub const ALL: [StageKind; Self::COUNT] = [
        StageKind::Vertex,
        StageKind::Fragment,
        StageKind::TessControl,
        StageKind::TessEvaluation,
        StageKind::Geometry,
        StageKind::Compute,
    ];

    /// Converts a raw GL shader type enum, e.g. `glow::VERTEX_SHADER`.
    pub fn from_gl(kind: u32) -> Result<Self> {
        match kind {
            glow::VERTEX_SHADER => Ok(StageKind::Vertex),
            glow::FRAGMENT_SHADER => Ok(StageKind::Fragment),
            glow::TESS_CONTROL_SHADER => Ok(StageKind::TessControl),
            glow::TESS_EVALUATION_SHADER => Ok(StageKind::TessEvaluation),
            glow::GEOMETRY_SHADER => Ok(StageKind::Geometry),
            glow::COMPUTE_SHADER => Ok(StageKind::Compute),
            other => Err(Error::UnknownStage(other)),
        }
    }

    pub fn to_gl(self) -> u32 {
        match self {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
            StageKind::TessControl => glow::TESS_CONTROL_SHADER,
            StageKind::TessEvaluation => glow::TESS_EVALUATION_SHADER,
            StageKind::Geometry => glow::GEOMETRY_SHADER,
            StageKind::Compute => glow::COMPUTE_SHADER,
        }
    }

    pub fn index(self) -> usize {
        match self {
            StageKind::Vertex => 0,
            StageKind::Fragment => 1,
            StageKind::TessControl => 2,
            StageKind::TessEvaluation => 3,
            StageKind::Geometry => 4,
            StageKind::Compute => 5,
        }
    }

    /// Name used in diagnostics, as in `[Vertex Shader] Compilation failed`.
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Vertex => "Vertex",
            StageKind::Fragment => "Fragment",
            StageKind::TessControl => "Tesselation Control",
            StageKind::TessEvaluation => "Tesselation Evaluation",
            StageKind::Geometry => "Geometry",
            StageKind::Compute => "Compute",
        }
    }
}

impl TryFrom<u32> for StageKind {
    type Error = Error;

    fn try_from(kind: u32) -> Result<Self> {
        Self::from_gl(kind)
    }
}

/// One optional shader handle per stage kind.
#[derive(Debug, Clone)]
pub struct StageSet<S> {
    slots: [Option<S>; StageKind::COUNT],
}

impl<S> Default for StageSet<S> {
    fn default() -> Self {
        StageSet {
            slots: Default::default(),
        }
    }
}

impl<S: Copy> StageSet<S> {
    pub fn get(&self, kind: StageKind) -> Option<S> {
        self.slots[kind.index()]
    }

    /// Stores `shader` in the slot for `kind`, handing back whatever was there.
    pub fn insert(&mut self, kind: StageKind, shader: S) -> Option<S> {
        self.slots[kind.index()].replace(shader)
    }

    pub fn take(&mut self, kind: StageKind) -> Option<S> {
        self.slots[kind.index()].take()
    }

    /// Empties every slot, yielding the populated ones in slot order.
    pub fn drain(&mut self) -> impl Iterator<Item = (StageKind, S)> + '_ {
        StageKind::ALL
            .into_iter()
            .filter_map(move |kind| self.take(kind).map(|shader| (kind, shader)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

pub fn load_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::SourceRead {
        path: path.to_path_buf(),
        source,
    })
}
