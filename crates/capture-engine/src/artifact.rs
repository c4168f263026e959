//! Recorded media: chunks, assembled artifacts, and preview handles.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// One unit of incrementally encoded media, immutable once produced.
///
/// Chunks are strictly ordered by production time; the artifact is their
/// in-order concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    data: Vec<u8>,
}

impl Chunk {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The finalized recording: all payload chunks concatenated in
/// production order, plus the advertised mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    data: Vec<u8>,
    mime_type: String,
}

impl ExportArtifact {
    /// Concatenate chunks in the order given. Callers are responsible
    /// for arrival ordering; reordering changes the byte sequence and
    /// breaks decodability.
    pub fn from_chunks(chunks: &[Chunk], mime_type: impl Into<String>) -> Self {
        let total: usize = chunks.iter().map(Chunk::len).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in chunks {
            data.extend_from_slice(chunk.data());
        }
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

static NEXT_PREVIEW_ID: AtomicU64 = AtomicU64::new(1);

/// A revocable reference to an in-memory artifact, analogous to an
/// object URL. At most one is live per recorder; minting a replacement
/// requires releasing the previous handle first or it leaks.
///
/// Clones share revocation state, so a stale copy held by a UI observes
/// the release.
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    uri: String,
    revoked: Arc<AtomicBool>,
}

impl PreviewHandle {
    /// Mint a fresh live handle with a process-unique URI.
    pub fn mint() -> Self {
        let id = NEXT_PREVIEW_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            uri: format!("blob:annocam/{id}"),
            revoked: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::SeqCst)
    }

    /// Release the handle. Idempotent.
    pub fn revoke(&self) {
        if !self.revoked.swap(true, Ordering::SeqCst) {
            tracing::debug!(uri = %self.uri, "Preview handle revoked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_concatenates_in_order() {
        let chunks = vec![
            Chunk::new(vec![1, 2, 3]),
            Chunk::new(vec![4]),
            Chunk::new(vec![5, 6]),
        ];
        let artifact = ExportArtifact::from_chunks(&chunks, "video/webm");
        assert_eq!(artifact.data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(artifact.mime_type(), "video/webm");
    }

    #[test]
    fn reordering_chunks_changes_artifact_bytes() {
        let a = Chunk::new(vec![1, 2]);
        let b = Chunk::new(vec![3]);
        let forward = ExportArtifact::from_chunks(&[a.clone(), b.clone()], "video/webm");
        let backward = ExportArtifact::from_chunks(&[b, a], "video/webm");
        assert_ne!(forward.data(), backward.data());
    }

    #[test]
    fn empty_chunk_list_yields_empty_artifact() {
        let artifact = ExportArtifact::from_chunks(&[], "video/webm");
        assert!(artifact.is_empty());
    }

    #[test]
    fn preview_handles_are_unique_and_revocable() {
        let first = PreviewHandle::mint();
        let second = PreviewHandle::mint();
        assert_ne!(first.uri(), second.uri());

        let observer = first.clone();
        assert!(!observer.is_revoked());
        first.revoke();
        first.revoke(); // idempotent
        assert!(observer.is_revoked());
        assert!(!second.is_revoked());
    }
}
