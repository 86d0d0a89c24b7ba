//! Temporary artifact tracking for a single job.
//!
//! Every on-disk byproduct of the pipeline is acquired through an
//! [`ArtifactStore`] and deleted when the job ends, whatever the outcome.

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// Kind of temporary artifact a pipeline stage produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    RawVideo,
    RawAudio,
    NormalizedAudio,
    FrameImage,
}

impl ArtifactKind {
    fn file_name(&self, seq: u32) -> String {
        match self {
            ArtifactKind::RawVideo => "raw-video.mp4".to_string(),
            ArtifactKind::RawAudio => "raw-audio.wav".to_string(),
            ArtifactKind::NormalizedAudio => "normalized-audio.wav".to_string(),
            ArtifactKind::FrameImage => format!("frame-{:02}.jpg", seq),
        }
    }
}

/// Tracks every temp path created for one job and guarantees cleanup.
///
/// Stages never build temp paths themselves; they acquire them here so the
/// pipeline can delete everything in one place when the job terminates.
pub struct ArtifactStore {
    dir: PathBuf,
    registered: Mutex<Vec<PathBuf>>,
    next_seq: AtomicU32,
}

impl ArtifactStore {
    /// Create the job-scoped temp directory.
    pub fn create(temp_root: &Path, job_id: Uuid) -> Result<Self> {
        let dir = temp_root.join(format!("job-{}", job_id));
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            registered: Mutex::new(Vec::new()),
            next_seq: AtomicU32::new(0),
        })
    }

    /// Reserve a path for an artifact of the given kind.
    ///
    /// The file is not created here; the path is registered for cleanup
    /// whether or not the stage ends up writing it.
    pub fn acquire(&self, kind: ArtifactKind) -> PathBuf {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(kind.file_name(seq));
        self.registered.lock().unwrap().push(path.clone());
        path
    }

    /// The job-scoped directory artifacts live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of registered artifacts still present on disk.
    pub fn remaining(&self) -> usize {
        self.registered
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.exists())
            .count()
    }

    /// Delete every registered artifact and the job directory.
    ///
    /// Never fails: a missing file or a permission error during cleanup must
    /// not mask the pipeline's real result.
    pub fn release_all(&self) {
        let registered = self.registered.lock().unwrap();
        for path in registered.iter() {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Deleted temp artifact {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to delete temp artifact {}: {}", path.display(), e),
            }
        }
        if let Err(e) = std::fs::remove_dir(&self.dir) {
            debug!("Could not remove job directory {}: {}", self.dir.display(), e);
        }
    }
}
