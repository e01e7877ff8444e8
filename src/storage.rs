use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Filesystem store for finished PDF artifacts.
///
/// Paths are keyed exclusively by generated UUIDs; client-supplied strings
/// never become path components.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    serving_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(serving_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let serving_dir = serving_dir.into();
        std::fs::create_dir_all(&serving_dir)?;
        Ok(Self { serving_dir })
    }

    pub fn artifact_path(&self, id: &Uuid) -> PathBuf {
        self.serving_dir.join(format!("{}.pdf", id))
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.artifact_path(id).is_file()
    }

    /// Moves a finished PDF into the serving directory. The rename is the
    /// publish point: readers either see the complete artifact or nothing.
    pub fn publish(&self, src: &Path, id: &Uuid) -> io::Result<PathBuf> {
        let dest = self.artifact_path(id);
        std::fs::rename(src, &dest)?;
        Ok(dest)
    }
}
