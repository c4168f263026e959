//! Session orchestration: startup ordering, recording state, teardown.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use annocam_common::{AnnocamError, AnnocamResult, AppConfig};
use annocam_detect::{DetectorConfig, FaceDetector};
use annocam_frame_model::{shared, DisplaySize, FrameSource, PixelSurface, SharedSurface};
use annocam_render_engine::{AnnotationRenderer, Compositor, RenderStyle};

use crate::camera::{CameraProvider, CameraRequest};
use crate::recorder::{RecorderConfig, StreamRecorder};

/// Configuration for one annotation session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// URI the detector loads its model assets from.
    pub model_uri: String,

    /// Requested camera resolution.
    pub camera: CameraRequest,

    /// Compositor refresh rate (the display-refresh analog).
    pub refresh_hz: u32,

    /// Detector invocation options.
    pub detector: DetectorConfig,

    /// Annotation draw style.
    pub style: RenderStyle,

    /// Recorder settings.
    pub recorder: RecorderConfig,
}

impl SessionConfig {
    /// Build from the app config, which carries the persisted defaults.
    pub fn from_app_config(config: &AppConfig, model_uri: impl Into<String>) -> Self {
        Self {
            model_uri: model_uri.into(),
            camera: CameraRequest::new(config.camera.width, config.camera.height),
            refresh_hz: config.recording.capture_fps,
            detector: DetectorConfig::default(),
            style: RenderStyle::default(),
            recorder: RecorderConfig::from(&config.recording),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default(), "models")
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed; nothing acquired yet.
    Created,
    /// Assets loaded, camera acquired, surfaces sized, recorder armed.
    Open,
    /// Compositing loop running.
    Active,
    /// Torn down.
    Closed,
}

/// Owns the whole pipeline: camera, surfaces, compositor, recorder.
///
/// All previously-ambient state (current recorder, live preview handle)
/// lives here with a defined lifecycle, so teardown and double-release
/// bugs are structurally impossible.
pub struct SessionController {
    config: SessionConfig,
    camera: Arc<dyn CameraProvider>,
    detector: Arc<dyn FaceDetector>,
    state: SessionState,
    source: Option<Arc<dyn FrameSource>>,
    overlay: Option<SharedSurface>,
    output: Option<SharedSurface>,
    compositor: Option<Compositor>,
    recorder: StreamRecorder,
}

impl SessionController {
    pub fn new(
        camera: Arc<dyn CameraProvider>,
        detector: Arc<dyn FaceDetector>,
        config: SessionConfig,
    ) -> Self {
        let recorder = StreamRecorder::new(config.recorder.clone());
        Self::with_recorder(camera, detector, config, recorder)
    }

    /// Inject a recorder (tests swap in scripted encoders this way).
    pub fn with_recorder(
        camera: Arc<dyn CameraProvider>,
        detector: Arc<dyn FaceDetector>,
        config: SessionConfig,
        recorder: StreamRecorder,
    ) -> Self {
        Self {
            config,
            camera,
            detector,
            state: SessionState::Created,
            source: None,
            overlay: None,
            output: None,
            compositor: None,
            recorder,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Native size the surfaces were fixed to, once open.
    pub fn native_size(&self) -> Option<DisplaySize> {
        self.source.as_ref().map(|s| s.native_size())
    }

    /// The composited surface the recorder captures.
    pub fn output_surface(&self) -> Option<SharedSurface> {
        self.output.clone()
    }

    /// Start up the pipeline, in strict order: load detector assets,
    /// acquire the camera, fix surface dimensions, arm the recorder.
    ///
    /// Each step is waited on before the next; a failure aborts the
    /// session before any later resource exists. The compositing loop is
    /// NOT started here — that waits for `mark_playback_ready`.
    pub async fn open(&mut self) -> AnnocamResult<()> {
        if self.state != SessionState::Created {
            return Err(AnnocamError::session(format!(
                "open() in state {:?}",
                self.state
            )));
        }

        tracing::info!(model_uri = %self.config.model_uri, "Loading detector assets");
        self.detector.load(&self.config.model_uri).await?;

        tracing::info!(
            width = self.config.camera.width,
            height = self.config.camera.height,
            "Acquiring camera"
        );
        let source = self.camera.open(self.config.camera).await?;

        // Surface dimensions are fixed here for the session's lifetime.
        let native = source.native_size();
        self.overlay = Some(shared(PixelSurface::new(native)));
        let output = shared(PixelSurface::new(native));
        self.recorder.arm(output.clone());
        self.output = Some(output);
        self.source = Some(source);

        self.state = SessionState::Open;
        tracing::info!(?native, "Session open");
        Ok(())
    }

    /// The playback-readiness signal: the first frame is available and
    /// the compositing loop may start. Idempotent once active.
    pub fn mark_playback_ready(&mut self) -> AnnocamResult<()> {
        match self.state {
            SessionState::Active => {
                tracing::debug!("Playback already marked ready; ignoring");
                return Ok(());
            }
            SessionState::Open => {}
            other => {
                return Err(AnnocamError::session(format!(
                    "mark_playback_ready() in state {other:?}"
                )));
            }
        }

        // Open guarantees these exist.
        let (Some(source), Some(overlay), Some(output)) = (
            self.source.clone(),
            self.overlay.clone(),
            self.output.clone(),
        ) else {
            return Err(AnnocamError::session("session surfaces missing"));
        };

        let mut compositor = Compositor::new(
            source,
            self.detector.clone(),
            self.config.detector.clone(),
            AnnotationRenderer::new(self.config.style.clone()),
            overlay,
            output,
            self.config.refresh_hz,
        );
        compositor.spawn()?;
        self.compositor = Some(compositor);
        self.state = SessionState::Active;
        Ok(())
    }

    pub fn start_recording(&mut self) -> AnnocamResult<()> {
        self.recorder.start()
    }

    pub async fn stop_recording(&mut self) -> AnnocamResult<()> {
        self.recorder.stop().await
    }

    /// Write the last artifact to disk; `None` when nothing is recorded.
    pub fn export(&self, dir: &Path, filename: &str) -> AnnocamResult<Option<PathBuf>> {
        self.recorder.export(dir, filename)
    }

    pub fn recorder(&self) -> &StreamRecorder {
        &self.recorder
    }

    /// Tear down: cancel the compositing loop, release the preview
    /// handle. Safe to call in any state, any number of times.
    pub async fn close(&mut self) {
        if let Some(mut compositor) = self.compositor.take() {
            compositor.cancel().await;
        }
        self.recorder.release_preview();
        if self.state != SessionState::Closed {
            tracing::info!("Session closed");
        }
        self.state = SessionState::Closed;
    }
}
