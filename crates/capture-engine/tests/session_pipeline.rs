//! End-to-end session tests: camera → compositor → recorder → export.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use annocam_capture_engine::{
    decode_raw_segments, CameraRequest, Chunk, ChunkEncoder, DeniedCamera, EncoderFactory,
    RecorderConfig, RecorderState, SessionConfig, SessionController, SessionState, StreamRecorder,
    SyntheticCamera,
};
use annocam_common::{AnnocamError, AnnocamResult};
use annocam_detect::{DetectorConfig, FixtureDetector};
use annocam_frame_model::DisplaySize;
use annocam_render_engine::RenderStyle;
use async_trait::async_trait;
use tokio::sync::mpsc;

static LOGGING: Once = Once::new();

fn fast_session_config() -> SessionConfig {
    LOGGING.call_once(annocam_common::logging::init_default_logging);
    SessionConfig {
        model_uri: "fixture://tiny".into(),
        camera: CameraRequest::new(60, 40),
        refresh_hz: 120,
        detector: DetectorConfig::default(),
        style: RenderStyle::default(),
        recorder: RecorderConfig {
            capture_fps: 60,
            chunk_interval: Duration::from_millis(25),
            mime_type: "video/webm;codecs=vp9".into(),
            bitrate_bps: 2_500_000,
        },
    }
}

fn synthetic_session(detector: FixtureDetector) -> SessionController {
    SessionController::new(
        Arc::new(SyntheticCamera),
        Arc::new(detector),
        fast_session_config(),
    )
}

#[tokio::test]
async fn full_pipeline_records_and_exports() {
    let mut session = synthetic_session(FixtureDetector::single_face());
    assert_eq!(session.state(), SessionState::Created);

    session.open().await.unwrap();
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(session.native_size(), Some(DisplaySize::new(60, 40)));
    assert!(session.recorder().is_armed());

    session.mark_playback_ready().unwrap();
    assert_eq!(session.state(), SessionState::Active);

    session.start_recording().unwrap();
    assert!(session.recorder().is_recording());
    tokio::time::sleep(Duration::from_millis(120)).await;
    session.stop_recording().await.unwrap();

    assert_eq!(session.recorder().state(), RecorderState::Stopped);
    assert!(session.recorder().chunk_count() > 0);
    let artifact = session.recorder().artifact().expect("artifact assembled");
    assert_eq!(artifact.mime_type(), "video/webm;codecs=vp9");

    // Every sampled frame decodes whole from the concatenated chunks.
    let frames = decode_raw_segments(artifact.data()).unwrap();
    assert!(!frames.is_empty());
    assert!(frames.iter().all(|f| f.len() == 60 * 40 * 4));

    let preview = session.recorder().preview().expect("preview minted").clone();
    assert!(!preview.is_revoked());

    let dir = std::env::temp_dir().join("annocam_test_export");
    let path = session
        .export(&dir, "recorded-video.webm")
        .unwrap()
        .expect("artifact written");
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, artifact.data());
    std::fs::remove_dir_all(&dir).ok();

    session.close().await;
    assert_eq!(session.state(), SessionState::Closed);
    assert!(preview.is_revoked());
}

#[tokio::test]
async fn denied_camera_aborts_startup() {
    let mut session = SessionController::new(
        Arc::new(DeniedCamera::new("permission denied")),
        Arc::new(FixtureDetector::single_face()),
        fast_session_config(),
    );

    let err = session.open().await.unwrap_err();
    assert!(err.is_startup_fatal());
    assert_eq!(session.state(), SessionState::Created);
    assert!(!session.recorder().is_armed());
    session.close().await;
}

#[tokio::test]
async fn failed_model_load_aborts_before_camera() {
    let mut config = fast_session_config();
    config.model_uri = String::new(); // fixture treats empty URI as missing assets
    let mut session = SessionController::new(
        Arc::new(SyntheticCamera),
        Arc::new(FixtureDetector::single_face()),
        config,
    );

    let err = session.open().await.unwrap_err();
    assert!(err.is_startup_fatal());
    assert_eq!(session.state(), SessionState::Created);
    assert!(session.native_size().is_none());
}

#[tokio::test]
async fn playback_ready_requires_open_session() {
    let mut session = synthetic_session(FixtureDetector::empty());
    assert!(session.mark_playback_ready().is_err());

    session.open().await.unwrap();
    session.mark_playback_ready().unwrap();
    // Idempotent once active.
    session.mark_playback_ready().unwrap();
    assert_eq!(session.state(), SessionState::Active);
    session.close().await;
}

#[tokio::test]
async fn export_without_recording_is_a_no_op() {
    let mut session = synthetic_session(FixtureDetector::empty());
    session.open().await.unwrap();

    let dir = std::env::temp_dir().join("annocam_test_no_artifact");
    assert!(session.export(&dir, "out.webm").unwrap().is_none());
    assert!(!dir.join("out.webm").exists());
    session.close().await;
}

#[tokio::test]
async fn close_is_idempotent() {
    let mut session = synthetic_session(FixtureDetector::empty());
    session.open().await.unwrap();
    session.mark_playback_ready().unwrap();

    session.close().await;
    session.close().await;
    assert_eq!(session.state(), SessionState::Closed);
}

/// Encoder that plays back a script: some chunks on start, some only at
/// finalize. Exercises the collector drain and empty-chunk filtering
/// without timing dependence.
struct ScriptedEncoder {
    immediate: Vec<Chunk>,
    trailing: Vec<Chunk>,
    tx: Option<mpsc::UnboundedSender<Chunk>>,
}

impl ScriptedEncoder {
    fn factory(
        immediate: Vec<Vec<u8>>,
        trailing: Vec<Vec<u8>>,
        starts: Arc<AtomicUsize>,
    ) -> EncoderFactory {
        let immediate = Arc::new(immediate);
        let trailing = Arc::new(trailing);
        Arc::new(move || {
            starts.fetch_add(1, Ordering::SeqCst);
            Box::new(ScriptedEncoder {
                immediate: immediate.iter().cloned().map(Chunk::new).collect(),
                trailing: trailing.iter().cloned().map(Chunk::new).collect(),
                tx: None,
            })
        })
    }
}

#[async_trait]
impl ChunkEncoder for ScriptedEncoder {
    fn start(
        &mut self,
        _stream: annocam_capture_engine::CaptureStream,
        _chunk_interval: Duration,
    ) -> AnnocamResult<mpsc::UnboundedReceiver<Chunk>> {
        if self.tx.is_some() {
            return Err(AnnocamError::encoder("encoder already started"));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        for chunk in self.immediate.drain(..) {
            let _ = tx.send(chunk);
        }
        self.tx = Some(tx);
        Ok(rx)
    }

    async fn finalize(&mut self) -> AnnocamResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AnnocamError::encoder("finalize before start"))?;
        for chunk in self.trailing.drain(..) {
            let _ = tx.send(chunk);
        }
        Ok(())
    }
}

fn scripted_session(
    immediate: Vec<Vec<u8>>,
    trailing: Vec<Vec<u8>>,
    starts: Arc<AtomicUsize>,
) -> SessionController {
    let config = fast_session_config();
    let recorder = StreamRecorder::with_encoder_factory(
        config.recorder.clone(),
        ScriptedEncoder::factory(immediate, trailing, starts),
    );
    SessionController::with_recorder(
        Arc::new(SyntheticCamera),
        Arc::new(FixtureDetector::empty()),
        config,
        recorder,
    )
}

#[tokio::test]
async fn trailing_chunks_land_in_the_artifact() {
    let starts = Arc::new(AtomicUsize::new(0));
    let mut session = scripted_session(
        vec![vec![1, 2], vec![3]],
        vec![vec![4, 5, 6]],
        starts.clone(),
    );
    session.open().await.unwrap();

    session.start_recording().unwrap();
    session.stop_recording().await.unwrap();

    // In production order, trailing chunk included.
    let artifact = session.recorder().artifact().unwrap();
    assert_eq!(artifact.data(), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(session.recorder().chunk_count(), 3);
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    session.close().await;
}

#[tokio::test]
async fn zero_size_chunks_are_dropped() {
    let starts = Arc::new(AtomicUsize::new(0));
    let mut session = scripted_session(
        vec![vec![7], vec![], vec![8]],
        vec![vec![]],
        starts,
    );
    session.open().await.unwrap();

    session.start_recording().unwrap();
    session.stop_recording().await.unwrap();

    assert_eq!(session.recorder().chunk_count(), 2);
    assert_eq!(session.recorder().artifact().unwrap().data(), &[7, 8]);
    session.close().await;
}

#[tokio::test]
async fn double_start_does_not_spawn_a_second_encoder() {
    let starts = Arc::new(AtomicUsize::new(0));
    let mut session = scripted_session(vec![vec![9]], vec![], starts.clone());
    session.open().await.unwrap();

    session.start_recording().unwrap();
    session.start_recording().unwrap(); // guarded no-op
    assert_eq!(starts.load(Ordering::SeqCst), 1);

    session.stop_recording().await.unwrap();
    session.stop_recording().await.unwrap(); // also a no-op
    assert_eq!(session.recorder().state(), RecorderState::Stopped);
    session.close().await;
}

#[tokio::test]
async fn new_recording_replaces_artifact_and_revokes_preview() {
    let starts = Arc::new(AtomicUsize::new(0));
    let mut session = scripted_session(vec![vec![1]], vec![], starts.clone());
    session.open().await.unwrap();

    session.start_recording().unwrap();
    session.stop_recording().await.unwrap();
    let first_preview = session.recorder().preview().unwrap().clone();
    let first_uri = first_preview.uri().to_string();

    session.start_recording().unwrap();
    // Starting anew revokes the old handle and clears the old chunks.
    assert!(first_preview.is_revoked());
    assert!(!session.recorder().has_artifact());
    session.stop_recording().await.unwrap();

    let second_preview = session.recorder().preview().unwrap();
    assert_ne!(second_preview.uri(), first_uri);
    assert!(!second_preview.is_revoked());
    assert_eq!(starts.load(Ordering::SeqCst), 2);
    session.close().await;
}

#[tokio::test]
async fn recording_with_no_payload_yields_no_artifact() {
    let starts = Arc::new(AtomicUsize::new(0));
    let mut session = scripted_session(vec![], vec![vec![]], starts);
    session.open().await.unwrap();

    session.start_recording().unwrap();
    session.stop_recording().await.unwrap();

    assert_eq!(session.recorder().state(), RecorderState::Stopped);
    assert!(!session.recorder().has_artifact());
    assert!(session.recorder().preview().is_none());
    session.close().await;
}
