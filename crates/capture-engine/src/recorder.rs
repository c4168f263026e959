//! Stream recording: capture the composited surface, collect chunks,
//! assemble artifacts.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use annocam_common::{AnnocamError, AnnocamResult, RecordingClock, RecordingDefaults};
use annocam_frame_model::SharedSurface;

use crate::artifact::{Chunk, ExportArtifact, PreviewHandle};
use crate::encoder::{CaptureStream, ChunkEncoder, EncoderFactory, RawSegmentEncoder};

/// Recorder configuration, derived from the app defaults.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Capture stream sampling rate.
    pub capture_fps: u32,

    /// Chunk timeslice.
    pub chunk_interval: Duration,

    /// Mime type stamped on assembled artifacts.
    pub mime_type: String,

    /// Target bitrate, passed through to encoders that honor it.
    pub bitrate_bps: u32,
}

impl From<&RecordingDefaults> for RecorderConfig {
    fn from(defaults: &RecordingDefaults) -> Self {
        Self {
            capture_fps: defaults.capture_fps,
            chunk_interval: Duration::from_millis(defaults.chunk_interval_ms),
            mime_type: defaults.mime_type.clone(),
            bitrate_bps: defaults.bitrate_bps,
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::from(&RecordingDefaults::default())
    }
}

/// State of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Armed (or not) but not recording.
    Idle,
    /// Chunks are being produced and collected.
    Recording,
    /// A recording finished; its artifact is available.
    Stopped,
}

/// Captures the output surface as a stream and manages one recording
/// session at a time.
///
/// Misuse (double start, stop without start) is guarded as a no-op and
/// never corrupts chunk ordering; only arming and encoder startup can
/// fail.
pub struct StreamRecorder {
    config: RecorderConfig,
    encoder_factory: EncoderFactory,
    stream: Option<CaptureStream>,
    state: RecorderState,
    chunks: Arc<Mutex<Vec<Chunk>>>,
    encoder: Option<Box<dyn ChunkEncoder>>,
    collector: Option<tokio::task::JoinHandle<u64>>,
    artifact: Option<ExportArtifact>,
    preview: Option<PreviewHandle>,
    clock: Option<RecordingClock>,
}

impl StreamRecorder {
    pub fn new(config: RecorderConfig) -> Self {
        Self::with_encoder_factory(config, RawSegmentEncoder::factory())
    }

    /// Inject a custom encoder implementation (tests, platform backends).
    pub fn with_encoder_factory(config: RecorderConfig, encoder_factory: EncoderFactory) -> Self {
        Self {
            config,
            encoder_factory,
            stream: None,
            state: RecorderState::Idle,
            chunks: Arc::new(Mutex::new(Vec::new())),
            encoder: None,
            collector: None,
            artifact: None,
            preview: None,
            clock: None,
        }
    }

    /// Bind the capture stream to the output surface. Must be called once
    /// the surface's final dimensions are fixed; idempotent afterwards.
    pub fn arm(&mut self, surface: SharedSurface) {
        if self.stream.is_some() {
            tracing::debug!("Recorder already armed; ignoring");
            return;
        }
        self.stream = Some(CaptureStream::new(surface, self.config.capture_fps));
        tracing::info!(fps = self.config.capture_fps, "Recorder armed");
    }

    pub fn is_armed(&self) -> bool {
        self.stream.is_some()
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Payload chunks collected so far (or in the finished recording).
    pub fn chunk_count(&self) -> usize {
        self.chunks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn artifact(&self) -> Option<&ExportArtifact> {
        self.artifact.as_ref()
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    /// Recording duration so far.
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.as_ref().map(|c| c.elapsed_secs()).unwrap_or(0.0)
    }

    /// Begin a new recording session.
    ///
    /// Resets the chunk sequence, releases any live preview handle, and
    /// starts a fresh encoder. Calling while already recording is a
    /// no-op: two concurrent encoders on one surface is the bug class
    /// this guard exists for.
    pub fn start(&mut self) -> AnnocamResult<()> {
        if self.state == RecorderState::Recording {
            tracing::warn!("start() while already recording; ignoring");
            return Ok(());
        }
        let Some(stream) = self.stream.clone() else {
            return Err(AnnocamError::encoder("recorder is not armed"));
        };

        self.chunks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.artifact = None;
        if let Some(preview) = self.preview.take() {
            preview.revoke();
        }

        let mut encoder = (self.encoder_factory)();
        let mut rx = encoder.start(stream, self.config.chunk_interval)?;

        // Chunk arrival is a fire-and-forget event per chunk; the
        // collector is the single mutation point for the sequence.
        let chunks = self.chunks.clone();
        self.collector = Some(tokio::spawn(async move {
            let mut appended: u64 = 0;
            while let Some(chunk) = rx.recv().await {
                if chunk.is_empty() {
                    tracing::trace!("Dropping zero-size chunk");
                    continue;
                }
                chunks
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(chunk);
                appended += 1;
            }
            appended
        }));

        self.encoder = Some(encoder);
        self.clock = Some(RecordingClock::start());
        self.state = RecorderState::Recording;
        tracing::info!(
            timeslice_ms = self.config.chunk_interval.as_millis() as u64,
            mime = %self.config.mime_type,
            "Recording started"
        );
        Ok(())
    }

    /// Stop the active recording and assemble the artifact.
    ///
    /// Finalize is asynchronous: the encoder flushes, the collector
    /// drains every chunk that was still in flight, and only then are
    /// chunks concatenated. Stopping when not recording is a no-op.
    pub async fn stop(&mut self) -> AnnocamResult<()> {
        if self.state != RecorderState::Recording {
            tracing::debug!("stop() without active recording; ignoring");
            return Ok(());
        }

        // Wind the state machine down even when finalize fails: dropping
        // the encoder closes the chunk channel, the collector drains
        // whatever arrived, and the recorder lands in Stopped either way.
        let mut encoder = self.encoder.take();
        let finalized = match encoder.as_mut() {
            Some(encoder) => encoder.finalize().await,
            None => Ok(()),
        };
        drop(encoder);

        if let Some(collector) = self.collector.take() {
            match collector.await {
                Ok(appended) => tracing::info!(appended, "Chunk collector drained"),
                Err(e) => tracing::warn!(error = %e, "Chunk collector join failed"),
            }
        }
        self.state = RecorderState::Stopped;

        if let Err(e) = finalized {
            tracing::warn!(error = %e, "Encoder finalize failed; no artifact assembled");
            return Err(e);
        }

        let elapsed = self.elapsed_secs();
        let chunks = self.chunks.lock().unwrap_or_else(|e| e.into_inner());
        if chunks.is_empty() {
            tracing::warn!("Recording produced no payload chunks; nothing to preview");
        } else {
            let artifact = ExportArtifact::from_chunks(&chunks, self.config.mime_type.clone());
            tracing::info!(
                bytes = artifact.len(),
                chunks = chunks.len(),
                duration_secs = elapsed,
                "Recording stopped"
            );
            self.artifact = Some(artifact);
            self.preview = Some(PreviewHandle::mint());
        }
        drop(chunks);
        Ok(())
    }

    /// Write the assembled artifact to `dir/filename`.
    ///
    /// No-op returning `None` when nothing has been recorded; the
    /// caller's UI surfaces that as a disabled action. No state change.
    pub fn export(&self, dir: &Path, filename: &str) -> AnnocamResult<Option<PathBuf>> {
        let Some(artifact) = self.artifact.as_ref().filter(|a| !a.is_empty()) else {
            tracing::debug!("Export requested with no recorded artifact; ignoring");
            return Ok(None);
        };

        std::fs::create_dir_all(dir)?;
        let path = dir.join(filename);
        std::fs::write(&path, artifact.data())?;
        tracing::info!(path = %path.display(), bytes = artifact.len(), "Artifact exported");
        Ok(Some(path))
    }

    /// Release the live preview handle, if any. Idempotent; used on
    /// teardown so a handle can never outlive the session.
    pub fn release_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.revoke();
        }
    }
}
