//! Chunked media encoding behind a trait.
//!
//! Real deployments plug in a platform encoder; the in-tree
//! `RawSegmentEncoder` produces a simple self-describing format so the
//! pipeline is usable and testable without one. Either way the recorder
//! only sees ordered chunks on a channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use annocam_common::{AnnocamError, AnnocamResult, RateController, RecordingClock};
use annocam_frame_model::SharedSurface;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::artifact::Chunk;

/// A readable view of the output surface for encoders.
///
/// Sampling may land between the compositor's draw calls; partial-frame
/// tearing is an accepted artifact, not something to lock against.
#[derive(Clone)]
pub struct CaptureStream {
    surface: SharedSurface,
    fps: u32,
}

impl CaptureStream {
    pub fn new(surface: SharedSurface, fps: u32) -> Self {
        Self {
            surface,
            fps: fps.max(1),
        }
    }

    /// Sampling rate the surface should be read at.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Snapshot the current surface pixels. `None` if the surface lock
    /// is poisoned, which an encoder treats as a skipped sample.
    pub fn sample(&self) -> Option<Vec<u8>> {
        self.surface.lock().ok().map(|s| s.snapshot())
    }
}

/// A chunk-producing media encoder.
///
/// `start` begins chunk production at the given timeslice and hands back
/// the receiving end of the chunk channel; `finalize` flushes whatever
/// is buffered, emits any trailing chunk, and closes the channel. The
/// channel closing is the encoder's end-of-stream signal.
#[async_trait]
pub trait ChunkEncoder: Send {
    fn start(
        &mut self,
        stream: CaptureStream,
        chunk_interval: Duration,
    ) -> AnnocamResult<mpsc::UnboundedReceiver<Chunk>>;

    async fn finalize(&mut self) -> AnnocamResult<()>;
}

/// Builds a fresh encoder per recording; the recorder never reuses one.
pub type EncoderFactory = Arc<dyn Fn() -> Box<dyn ChunkEncoder> + Send + Sync>;

/// Uncompressed segment encoder: samples the capture stream at its fps
/// and cuts a chunk on every timeslice boundary. Each sampled frame is
/// stored as a length-prefixed record, so concatenated chunks form one
/// decodable record stream regardless of where the cuts fell.
pub struct RawSegmentEncoder {
    stop: Arc<AtomicBool>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl RawSegmentEncoder {
    pub fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    /// Factory for the recorder's default configuration.
    pub fn factory() -> EncoderFactory {
        Arc::new(|| Box::new(RawSegmentEncoder::new()))
    }
}

impl Default for RawSegmentEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkEncoder for RawSegmentEncoder {
    fn start(
        &mut self,
        stream: CaptureStream,
        chunk_interval: Duration,
    ) -> AnnocamResult<mpsc::UnboundedReceiver<Chunk>> {
        if self.task.is_some() {
            return Err(AnnocamError::encoder("encoder already started"));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let stop = self.stop.clone();
        stop.store(false, Ordering::SeqCst);

        let frame_interval = Duration::from_secs_f64(1.0 / f64::from(stream.fps()));
        let chunk_ms = chunk_interval.as_millis().max(1) as u64;

        self.task = Some(tokio::spawn(async move {
            let clock = RecordingClock::start();
            let mut cutter = RateController::with_interval_ms(chunk_ms);
            // Consume the controller's always-true first tick so the
            // first chunk spans a full timeslice.
            cutter.should_tick(clock.elapsed_ms());

            let mut pending: Vec<u8> = Vec::new();
            loop {
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                tokio::time::sleep(frame_interval).await;

                if let Some(pixels) = stream.sample() {
                    pending.extend_from_slice(&(pixels.len() as u32).to_le_bytes());
                    pending.extend_from_slice(&pixels);
                }

                if cutter.should_tick(clock.elapsed_ms()) && !pending.is_empty() {
                    let chunk = Chunk::new(std::mem::take(&mut pending));
                    if tx.send(chunk).is_err() {
                        break;
                    }
                }
            }
            // Trailing flush on finalize
            if !pending.is_empty() {
                let _ = tx.send(Chunk::new(pending));
            }
        }));
        Ok(rx)
    }

    async fn finalize(&mut self) -> AnnocamResult<()> {
        let Some(task) = self.task.take() else {
            return Err(AnnocamError::encoder("finalize before start"));
        };
        self.stop.store(true, Ordering::SeqCst);
        task.await
            .map_err(|e| AnnocamError::encoder(format!("encoder task join failed: {e}")))?;
        Ok(())
    }
}

impl Drop for RawSegmentEncoder {
    fn drop(&mut self) {
        // A dropped encoder must not keep sampling the surface.
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Split a raw segment artifact back into frame records. Used by tests
/// and anything that wants to re-render a recording.
pub fn decode_raw_segments(data: &[u8]) -> AnnocamResult<Vec<Vec<u8>>> {
    let mut frames = Vec::new();
    let mut offset = 0usize;
    while offset < data.len() {
        if offset + 4 > data.len() {
            return Err(AnnocamError::encoder("truncated record header"));
        }
        let len = u32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]) as usize;
        offset += 4;
        if offset + len > data.len() {
            return Err(AnnocamError::encoder("truncated record payload"));
        }
        frames.push(data[offset..offset + len].to_vec());
        offset += len;
    }
    Ok(frames)
}
