//! The per-frame compositing loop.
//!
//! The compositor owns the pipeline's only repeating task: read the
//! current frame, obtain detections for it, draw annotations on the
//! overlay, then layer frame + overlay into the output surface the
//! recorder captures. The loop runs until cancelled; it has no natural
//! termination.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use annocam_common::{AnnocamError, AnnocamResult};
use annocam_detect::{DetectorConfig, FaceDetector};
use annocam_frame_model::{resize_detections, FrameSource, SharedSurface};
use tokio::time::MissedTickBehavior;

use crate::annotation::AnnotationRenderer;

/// Scheduling state of the compositor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositorState {
    /// Not scheduled.
    Idle,
    /// Rescheduling itself once per display refresh until cancelled.
    Running,
}

/// Everything one tick needs, cloned into the loop task.
#[derive(Clone)]
struct TickContext {
    source: Arc<dyn FrameSource>,
    detector: Arc<dyn FaceDetector>,
    detector_config: DetectorConfig,
    renderer: AnnotationRenderer,
    overlay: SharedSurface,
    output: SharedSurface,
}

/// The per-frame loop: fetch, detect, render, composite, reschedule.
pub struct Compositor {
    context: TickContext,
    refresh_hz: u32,
    cancel: Arc<AtomicBool>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl Compositor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Arc<dyn FrameSource>,
        detector: Arc<dyn FaceDetector>,
        detector_config: DetectorConfig,
        renderer: AnnotationRenderer,
        overlay: SharedSurface,
        output: SharedSurface,
        refresh_hz: u32,
    ) -> Self {
        Self {
            context: TickContext {
                source,
                detector,
                detector_config,
                renderer,
                overlay,
                output,
            },
            refresh_hz: refresh_hz.max(1),
            cancel: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    pub fn state(&self) -> CompositorState {
        if self.task.is_some() {
            CompositorState::Running
        } else {
            CompositorState::Idle
        }
    }

    /// Start the loop. Errors if already running: the output surface has
    /// exactly one writer.
    pub fn spawn(&mut self) -> AnnocamResult<()> {
        if self.task.is_some() {
            return Err(AnnocamError::render("compositor already running"));
        }

        self.cancel.store(false, Ordering::SeqCst);
        let context = self.context.clone();
        let cancel = self.cancel.clone();
        let refresh_hz = self.refresh_hz;

        self.task = Some(tokio::spawn(async move {
            run_loop(context, cancel, refresh_hz).await;
        }));
        tracing::info!(refresh_hz, "Compositor loop started");
        Ok(())
    }

    /// Cancel the pending reschedule and wait for the loop to wind down.
    /// Safe to call when idle.
    pub async fn cancel(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Compositor task join failed");
            }
            tracing::info!("Compositor loop stopped");
        }
    }
}

async fn run_loop(context: TickContext, cancel: Arc<AtomicBool>, refresh_hz: u32) {
    let mut interval =
        tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(refresh_hz)));
    // A late tick is dropped, not queued: if detection is slow the cadence
    // degrades gracefully instead of building a frame backlog.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if cancel.load(Ordering::SeqCst) {
            break;
        }
        tick(&context).await;
    }
}

/// One tick of the loop. Never fails: detector errors become an empty
/// detection set, and an unavailable frame or surface skips the tick
/// while the loop keeps rescheduling.
async fn tick(context: &TickContext) {
    let Some(frame) = context.source.current_frame() else {
        tracing::trace!("No frame available; skipping tick");
        return;
    };
    let display_size = frame.size();

    // The loop's only suspension point. The previous tick's output stays
    // visible while we wait.
    let detections = match context
        .detector
        .detect(&frame, &context.detector_config)
        .await
    {
        Ok(detections) => detections,
        Err(e) => {
            tracing::debug!(error = %e, "Detection failed; rendering frame without annotations");
            Vec::new()
        }
    };
    let resized = resize_detections(&detections, display_size);

    {
        let Ok(mut overlay) = context.overlay.lock() else {
            return;
        };
        context.renderer.render(&mut overlay, &resized);
    }

    // Fixed draw order: background frame first, annotations second.
    let Ok(mut output) = context.output.lock() else {
        return;
    };
    output.clear();
    output.draw_frame(&frame);
    let Ok(overlay) = context.overlay.lock() else {
        return;
    };
    output.composite_over(&overlay);
}
