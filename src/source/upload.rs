//! Upload acquisition: persisting in-memory bytes as a raw media artifact.

use super::{media_kind, AcquiredMedia, MediaKind};
use crate::artifact::{ArtifactKind, ArtifactStore};
use crate::error::{Result, SanseError};
use tracing::debug;

/// Write uploaded bytes into a raw media artifact.
pub async fn store_upload(
    store: &ArtifactStore,
    filename: &str,
    bytes: &[u8],
) -> Result<AcquiredMedia> {
    let kind = media_kind(filename).ok_or_else(|| {
        SanseError::InvalidInput(format!("Unsupported media file: {}", filename))
    })?;

    let artifact_kind = match kind {
        MediaKind::Video => ArtifactKind::RawVideo,
        MediaKind::Audio => ArtifactKind::RawAudio,
    };

    let path = store.acquire(artifact_kind);
    tokio::fs::write(&path, bytes).await?;
    debug!("Stored {} upload bytes at {}", bytes.len(), path.display());

    Ok(AcquiredMedia {
        path,
        kind,
        title: filename.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_store_upload_writes_artifact() {
        let temp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(temp.path(), Uuid::new_v4()).unwrap();

        let media = store_upload(&store, "talk.mp4", b"fake video bytes")
            .await
            .unwrap();

        assert_eq!(media.kind, MediaKind::Video);
        assert_eq!(media.title, "talk.mp4");
        assert_eq!(std::fs::read(&media.path).unwrap(), b"fake video bytes");

        store.release_all();
        assert_eq!(store.remaining(), 0);
    }

    #[tokio::test]
    async fn test_store_upload_rejects_unknown_extension() {
        let temp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(temp.path(), Uuid::new_v4()).unwrap();

        let result = store_upload(&store, "notes.pdf", b"%PDF").await;
        assert!(matches!(result, Err(SanseError::InvalidInput(_))));
    }
}
